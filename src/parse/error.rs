use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{ChannelKeyError, ModelError};

/// A structural error in an instrument descriptor or scene file.
///
/// Loading stops at the first one of these, nothing is partially built.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{context} must be {expected}")]
    WrongKind {
        context: String,
        expected: &'static str,
    },
    #[error("missing `{field}` in {context}")]
    MissingField {
        context: String,
        field: &'static str,
    },
    #[error("`{field}` of {context} must be {expected}")]
    InvalidField {
        context: String,
        field: String,
        expected: &'static str,
    },
    #[error("unrecognized channel target \"{target}\" in {context}")]
    UnknownTarget { context: String, target: String },
    #[error("unknown value type \"{value_type}\" in {context}")]
    UnknownValueType { context: String, value_type: String },
    #[error("discrete value '{name}' of {context} must be a 2-list of non-negative integers")]
    InvalidDiscreteValue { context: String, name: String },
    #[error("{context} requires min and max integers for its value range")]
    InvalidRange { context: String },
    #[error("invalid channel name '{name}' in {context}: {source}")]
    InvalidChannelKey {
        context: String,
        name: String,
        source: ChannelKeyError,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
}
