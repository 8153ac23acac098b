use std::path::PathBuf;

use thiserror::Error;

use super::{DurationError, ValueError};
use crate::{FractionError, LoadError, ModelError, Selector, TransportError};

/// Why an instruction cannot be executed. The message is the diagnostic
/// returned by `verify`.
#[derive(Error, Debug)]
pub enum InstructionError {
    #[error("Unknown command `{0}`.")]
    UnknownCommand(String),
    #[error("Takes no arguments.")]
    TakesNoArguments,
    #[error("Expects {0}.")]
    WrongArguments(&'static str),
    #[error("Expected `{}` to be a filepath.", .0.display())]
    NotAFile(PathBuf),
    #[error("Invalid scene file: {0}")]
    InvalidScene(#[from] SceneError),
    #[error(transparent)]
    Fraction(#[from] FractionError),
    #[error(transparent)]
    Duration(#[from] DurationError),
}

/// A scene file that does not match the loaded instruments.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("`{0}` does not name a known instrument.")]
    UnknownInstrument(String),
    #[error("`{instrument}` does not have a channel `{selector}`")]
    MissingChannel {
        instrument: String,
        selector: Selector,
    },
    #[error("value `{value}` for `{selector}` of `{instrument}` {source}")]
    InvalidValue {
        instrument: String,
        selector: Selector,
        value: String,
        source: ValueError,
    },
}

/// Failure of `execute`.
#[derive(Error, Debug)]
pub enum ControllerError {
    /// `execute` was called with an instruction that does not verify.
    #[error("[{instruction}] {source}")]
    ContractViolation {
        instruction: String,
        source: InstructionError,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failure to set up a `DmxCtl`.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("expects a device path and an instrument file path, got {0} arguments")]
    WrongArguments(usize),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}
