use thiserror::Error;

/// Why a protocol line was rejected. The line has no effect.
#[derive(Error, Debug, PartialEq)]
pub enum ProtocolError {
    #[error("empty line")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("unexpected '{0}' at end of line")]
    TrailingInput(String),
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error("address {0} is outside the universe")]
    AddressOutOfRange(usize),
    #[error("'{0}' is not a hex digit")]
    InvalidHexDigit(char),
    #[error("expected whole bytes, got {0} hex digits")]
    OddHexDigits(usize),
    #[error("expected exactly one byte, got '{0}'")]
    NotOneByte(String),
    #[error("frame data exceeds 512 bytes")]
    FrameOverflow,
}
