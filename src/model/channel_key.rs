use std::{num::ParseIntError, str::FromStr};

use thiserror::Error;

/// Maximum number of channels that can form one multi-byte value.
pub const MAX_VALUE_BYTES: usize = 8;

/// Channel name as written in an instrument descriptor.
///
/// A 16-bit pan value is split across two channels, `pan[0]` (least
/// significant byte) and `pan[1]`. A bare name like `master` is the same as
/// `master[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelKey {
    pub name: String,
    pub value_index: u8,
}

impl ChannelKey {
    pub fn new<T: Into<String>>(name: T, value_index: u8) -> Self {
        Self {
            name: name.into(),
            value_index,
        }
    }
}

impl std::fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.name, self.value_index)
    }
}

impl FromStr for ChannelKey {
    type Err = ChannelKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value_index) = match s.strip_suffix(']').and_then(|s| s.rsplit_once('[')) {
            Some((name, index)) => {
                let index: u8 = index
                    .trim()
                    .parse()
                    .map_err(|e| ChannelKeyError::InvalidIndex(index.to_owned(), e))?;
                if index as usize >= MAX_VALUE_BYTES {
                    return Err(ChannelKeyError::IndexTooLarge(index));
                }
                (name, index)
            }
            None => (s, 0),
        };

        if name.is_empty() {
            return Err(ChannelKeyError::EmptyName);
        }

        Ok(Self::new(name, value_index))
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ChannelKeyError {
    #[error("channel name is empty")]
    EmptyName,
    #[error("value index '{0}' is not a number; {1}")]
    InvalidIndex(String, ParseIntError),
    #[error("value index {0} is too large, values can have at most 8 bytes")]
    IndexTooLarge(u8),
}
