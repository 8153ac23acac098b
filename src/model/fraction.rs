use std::str::FromStr;

use thiserror::Error;

/// A level between 0 (off) and 1 (full).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, derive_more::Display)]
#[display(fmt = "{}", _0)]
pub struct Fraction(f64);

impl Fraction {
    pub const ZERO: Fraction = Fraction(0.0);
    pub const FULL: Fraction = Fraction(1.0);

    pub fn get(self) -> f64 {
        self.0
    }

    /// Scale `full_scale` by this fraction, truncating towards zero.
    pub fn of(self, full_scale: u64) -> u64 {
        (full_scale as f64 * self.0) as u64
    }

    /// This fraction of a single byte.
    pub fn byte(self) -> u8 {
        (255.0 * self.0) as u8
    }
}

impl TryFrom<f64> for Fraction {
    type Error = FractionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FractionError::OutOfRange(value))
        }
    }
}

impl FromStr for Fraction {
    type Err = FractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<f64>()
            .map_err(|_| FractionError::NotANumber(s.to_owned()))?
            .try_into()
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum FractionError {
    #[error("Fade value must be a number, got `{0}`.")]
    NotANumber(String),
    #[error("Fade value must be in [0, 1], got {0}.")]
    OutOfRange(f64),
}
