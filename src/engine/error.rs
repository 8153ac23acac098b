use std::{io, path::PathBuf};

use thiserror::Error;

/// Conditions that end the engine process.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("input closed")]
    InputClosed,
    #[error("could not read input: {0}")]
    Input(io::Error),
    #[error("'{}' is not a character device", .0.display())]
    NotACharDevice(PathBuf),
    #[error("could not open device '{}': {source}", path.display())]
    Device { path: PathBuf, source: io::Error },
    #[error("device fault: {0}")]
    DeviceFault(io::Error),
    #[error("unusable device descriptor: {0}")]
    Descriptor(io::Error),
}
