use thiserror::Error;

use crate::{full_scale, Channel, Fraction};

/// Why a scene value string does not fit its channels.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("'{0}' is not a hex digit")]
    InvalidHexDigit(char),
    #[error("is neither a discrete value name nor a level in [0, 1]")]
    NotALevel,
}

/// Translate a scene value string into the value carried by a group of
/// siblings.
///
/// - `#...` or `0x...` is hexadecimal, packed into nibbles in the order
///   written: the first digit is the least significant nibble. Digits beyond
///   the width of the group are ignored.
/// - A discrete value name of the first sibling gives that value's minimum.
/// - Anything else is a level in `[0, 1]` of the group's full scale.
pub fn resolve_value(value: &str, channels: &[Channel], group: &[usize]) -> Result<u64, ValueError> {
    if let Some(digits) = value.strip_prefix('#').or_else(|| value.strip_prefix("0x")) {
        let mut acc = 0u64;
        for (k, c) in digits.chars().enumerate() {
            let nibble = c.to_digit(16).ok_or(ValueError::InvalidHexDigit(c))?;
            if k < 2 * group.len() {
                acc |= (nibble as u64) << (4 * k);
            }
        }
        return Ok(acc);
    }

    let discrete = group
        .first()
        .and_then(|&i| channels.get(i))
        .and_then(|c| c.value_kind().discrete(value));
    if let Some(discrete) = discrete {
        return Ok(discrete.min);
    }

    let level: Fraction = value.parse().map_err(|_| ValueError::NotALevel)?;
    Ok(level.of(full_scale(group.len())))
}
