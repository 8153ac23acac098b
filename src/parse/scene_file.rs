use std::{convert::Infallible, path::Path};

use serde_yaml::Value;

use super::{get_yaml_value::scalar_string, LoadError};
use crate::Selector;

/// A scene document: instrument name prefixes mapped to channel assignments.
///
/// ```yaml
/// Spot:
///   master: 1
///   pan: "#0080"
///   gobo: star
/// Par2:
///   color: 0.5
/// ```
///
/// Hexadecimal values have to be quoted, otherwise YAML reads `#...` as a
/// comment and `0x...` as an integer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneFile {
    pub entries: Vec<SceneEntry>,
}

/// One `prefix > channel: value` assignment, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEntry {
    pub instrument_prefix: String,
    pub selector: Selector,
    pub value: String,
}

impl SceneFile {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LoadError> {
        let doc: Value = serde_yaml::from_str(yaml)?;
        let Value::Mapping(instruments) = doc else {
            return Err(LoadError::WrongKind {
                context: "scene file".into(),
                expected: "a mapping",
            });
        };

        let mut entries = Vec::new();
        for (prefix, channels) in &instruments {
            let prefix = scalar_string(prefix).ok_or_else(|| LoadError::WrongKind {
                context: "instrument key of scene file".into(),
                expected: "a scalar",
            })?;
            let channels = channels.as_mapping().ok_or_else(|| LoadError::WrongKind {
                context: format!("`{prefix}`"),
                expected: "a mapping",
            })?;

            for (channel, value) in channels {
                let channel = scalar_string(channel).ok_or_else(|| LoadError::WrongKind {
                    context: format!("channel key of `{prefix}`"),
                    expected: "a scalar",
                })?;
                let value = scalar_string(value).ok_or_else(|| LoadError::InvalidField {
                    context: format!("`{prefix}`"),
                    field: channel.clone(),
                    expected: "a scalar value (quote hexadecimal values)",
                })?;
                entries.push(SceneEntry {
                    instrument_prefix: prefix.clone(),
                    selector: channel.parse().unwrap_or_else(|never: Infallible| match never {}),
                    value,
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.into(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }
}
