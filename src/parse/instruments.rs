use std::path::Path;

use serde_yaml::{Mapping, Value};

use super::{
    get_yaml_value::{scalar_string, scalar_u64, GetYamlValue},
    LoadError,
};
use crate::{ChannelKey, DiscreteValue, Instrument, Target, Universe, UniverseAddress, ValueKind};

impl Universe {
    /// Build the universe from an instrument descriptor, a YAML sequence of
    /// instruments:
    ///
    /// ```yaml
    /// - name: Spot1
    ///   addr: 1
    ///   channels:
    ///     - name: master
    ///       target: master
    ///     - name: pan[0]
    ///       target: pan
    ///     - name: pan[1]
    ///     - name: gobo
    ///       values:
    ///         type: discrete
    ///         open: [0, 7]
    ///         star: [8, 15]
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LoadError> {
        let doc: Value = serde_yaml::from_str(yaml)?;
        let Value::Sequence(records) = doc else {
            return Err(LoadError::WrongKind {
                context: "instrument file".into(),
                expected: "a sequence",
            });
        };

        let instruments = records
            .iter()
            .enumerate()
            .map(|(i, record)| parse_instrument(i, record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Universe::new(instruments)?)
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

fn parse_instrument(index: usize, record: &Value) -> Result<Instrument, LoadError> {
    let record = record.as_mapping().ok_or_else(|| LoadError::WrongKind {
        context: format!("instrument {index}"),
        expected: "a mapping",
    })?;

    let name = record.required_string("name", &format!("instrument {index}"))?;
    let context = format!("instrument '{name}'");
    let addr: UniverseAddress =
        record.parse_required("addr", &context, "a universe address from 0 to 511")?;
    let channels = record
        .required("channels", &context)?
        .as_sequence()
        .ok_or_else(|| LoadError::InvalidField {
            context: context.clone(),
            field: "channels".into(),
            expected: "a sequence",
        })?;

    let mut instrument = Instrument::new(name, addr.get());
    for (i, channel) in channels.iter().enumerate() {
        parse_channel(&mut instrument, &context, i, channel)?;
    }
    Ok(instrument)
}

fn parse_channel(
    instrument: &mut Instrument,
    instrument_context: &str,
    index: usize,
    record: &Value,
) -> Result<(), LoadError> {
    let record = record.as_mapping().ok_or_else(|| LoadError::WrongKind {
        context: format!("channel {index} of {instrument_context}"),
        expected: "a mapping",
    })?;

    let name = record.required_string("name", &format!("channel {index} of {instrument_context}"))?;
    let context = format!("channel '{name}' of {instrument_context}");
    let key: ChannelKey = name
        .parse()
        .map_err(|source| LoadError::InvalidChannelKey {
            context: instrument_context.to_owned(),
            name: name.clone(),
            source,
        })?;

    let target = match record.optional_string("target", &context)? {
        Some(target) => Some(
            target
                .parse::<Target>()
                .map_err(|_| LoadError::UnknownTarget {
                    context: context.clone(),
                    target,
                })?,
        ),
        None => None,
    };

    let value_kind = match record.get("values") {
        Some(Value::Null) | None => None,
        Some(Value::Mapping(values)) => Some(parse_value_kind(values, &context)?),
        Some(_) => Err(LoadError::InvalidField {
            context: context.clone(),
            field: "values".into(),
            expected: "a mapping",
        })?,
    };

    instrument.add_channel(key, target, value_kind)?;
    Ok(())
}

fn parse_value_kind(values: &Mapping, context: &str) -> Result<ValueKind, LoadError> {
    match values.optional_string("type", context)?.as_deref() {
        None | Some("range") => {
            let bound = |field: &str| {
                values
                    .get(field)
                    .and_then(scalar_string)
                    .and_then(|s| s.trim().parse::<i64>().ok())
            };
            match (bound("min"), bound("max")) {
                (Some(min), Some(max)) => Ok(ValueKind::Range { min, max }),
                _ => Err(LoadError::InvalidRange {
                    context: context.to_owned(),
                }),
            }
        }
        Some("discrete") => {
            let mut discrete = Vec::new();
            for (name, pair) in values {
                let name = scalar_string(name).unwrap_or_default();
                if name == "type" {
                    continue;
                }
                let invalid = || LoadError::InvalidDiscreteValue {
                    context: context.to_owned(),
                    name: name.clone(),
                };
                let bounds: Vec<u64> = pair
                    .as_sequence()
                    .ok_or_else(invalid)?
                    .iter()
                    .map(|v| scalar_u64(v).ok_or_else(invalid))
                    .collect::<Result<_, _>>()?;
                let &[min, max] = bounds.as_slice() else {
                    return Err(invalid());
                };
                discrete.push(DiscreteValue { name, min, max });
            }
            Ok(ValueKind::Discrete(discrete))
        }
        Some(other) => Err(LoadError::UnknownValueType {
            context: context.to_owned(),
            value_type: other.to_owned(),
        }),
    }
}
