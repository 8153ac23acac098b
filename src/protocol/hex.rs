use super::ProtocolError;

pub(crate) fn nibble(c: char) -> Result<u8, ProtocolError> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or(ProtocolError::InvalidHexDigit(c))
}

/// Decode pairs of hex digits, most significant nibble first.
pub(crate) fn decode_bytes(hex: &str) -> Result<Vec<u8>, ProtocolError> {
    let nibbles = hex.chars().map(nibble).collect::<Result<Vec<u8>, _>>()?;
    if nibbles.len() % 2 != 0 {
        return Err(ProtocolError::OddHexDigits(nibbles.len()));
    }
    Ok(nibbles
        .chunks_exact(2)
        .map(|pair| match pair {
            [high, low] => high << 4 | low,
            _ => 0,
        })
        .collect())
}
