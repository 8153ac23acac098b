use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("could not start engine '{}': {source}", program.display())]
    Spawn { program: PathBuf, source: io::Error },
    #[error("engine process has no stdin pipe")]
    NoStdin,
    #[error("could not write to engine: {0}")]
    Write(#[from] io::Error),
}
