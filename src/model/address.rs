use std::{num::ParseIntError, str::FromStr};

use duplicate::duplicate_item;

use super::UNIVERSE_SIZE;

/// Address of a slot within the universe.
///
/// Universe addresses are 0-based and go from 0 to 511. On the wire, the
/// frame is one byte longer because it starts with the DMX start code, so
/// universe address `a` is transmitted in wire slot `a + 1`:
/// 0 => wire slot 1
/// 1 => wire slot 2
/// ...
/// 511 => wire slot 512
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    derive_more::Display,
)]
#[display(fmt = "{}", _0)]
pub struct UniverseAddress(u16);

impl UniverseAddress {
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Index of this address in the 513-byte wire frame.
    pub fn wire_slot(self) -> usize {
        self.get() + 1
    }

    /// The address `offset` slots further, if it is still inside the universe.
    pub fn offset(self, offset: usize) -> Result<Self, AddressError> {
        (self.get() + offset).try_into()
    }
}

#[allow(clippy::unnecessary_cast)]
#[duplicate_item(integer; [u16]; [u32]; [u64]; [usize])]
impl TryFrom<integer> for UniverseAddress {
    type Error = AddressError;

    fn try_from(value: integer) -> Result<Self, Self::Error> {
        if (value as u64) < UNIVERSE_SIZE as u64 {
            Ok(Self(value as u16))
        } else {
            Err(AddressError::OutOfRange(value as u64))
        }
    }
}

#[allow(clippy::unnecessary_cast)]
#[duplicate_item(integer; [i32]; [i64])]
impl TryFrom<integer> for UniverseAddress {
    type Error = AddressError;

    fn try_from(value: integer) -> Result<Self, Self::Error> {
        if value < 0 {
            Err(AddressError::Negative(value as i64))
        } else {
            (value as u64).try_into()
        }
    }
}

impl FromStr for UniverseAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>()?.try_into()
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AddressError {
    #[error("universe address {0} is out of range, only 0 to 511 is valid")]
    OutOfRange(u64),
    #[error("universe address {0} is negative")]
    Negative(i64),
    #[error("parsing error: {0}")]
    ParseIntError(#[from] ParseIntError),
}
