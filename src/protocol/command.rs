use std::{fmt, str::FromStr};

use super::{
    hex::{decode_bytes, nibble},
    ProtocolError,
};
use crate::{Frame, UniverseAddress, UNIVERSE_SIZE};

/// One line of the control protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace the whole universe.
    Frame(Box<Frame>),
    /// Set slots starting at `addr` to `bytes`, one address per byte.
    Set {
        addr: UniverseAddress,
        bytes: Vec<u8>,
    },
    /// Fade the slot at `addr` to `target`. A duration of 0 sets it at once.
    Fade {
        addr: UniverseAddress,
        duration_ms: u64,
        target: u8,
    },
    ToggleEcho,
    ToggleFaultSuppression,
}

impl Command {
    pub fn set(addr: UniverseAddress, byte: u8) -> Self {
        Command::Set {
            addr,
            bytes: vec![byte],
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Frame(frame) => {
                write!(f, "#")?;
                // the receiver zero-fills everything after the last digit
                let len = frame.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                frame.iter().take(len).try_for_each(|b| write!(f, "{b:02X}"))
            }
            Command::Set { addr, bytes } => {
                write!(f, "@{addr} ")?;
                bytes.iter().try_for_each(|b| write!(f, "{b:02X}"))
            }
            Command::Fade {
                addr,
                duration_ms,
                target,
            } => write!(f, ">{addr} {duration_ms} {target:02X}"),
            Command::ToggleEcho => write!(f, "e"),
            Command::ToggleFaultSuppression => write!(f, "s"),
        }
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    /// Decode a line (without its line terminator). The whole line is checked
    /// before a command is returned.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_matches(|c| c == ' ' || c == '\t');
        let mut chars = line.chars();
        let Some(sigil) = chars.next() else {
            return Err(ProtocolError::Empty);
        };
        let rest = chars.as_str();

        match sigil {
            '#' => decode_frame(rest),
            '@' => {
                let mut args = rest.split_whitespace();
                let addr = args.next().ok_or(ProtocolError::MissingArgument("address"))?;
                let bytes: String = args.collect();
                if bytes.is_empty() {
                    return Err(ProtocolError::MissingArgument("value"));
                }
                let bytes = decode_bytes(&bytes)?;
                let addr = address(addr)?;
                let last = addr.get() + bytes.len() - 1;
                if last >= UNIVERSE_SIZE {
                    return Err(ProtocolError::AddressOutOfRange(last));
                }
                Ok(Command::Set { addr, bytes })
            }
            '>' => {
                let mut args = rest.split_whitespace();
                let addr = args.next().ok_or(ProtocolError::MissingArgument("address"))?;
                let duration = args.next().ok_or(ProtocolError::MissingArgument("duration"))?;
                let target = args.next().ok_or(ProtocolError::MissingArgument("value"))?;
                if let Some(extra) = args.next() {
                    return Err(ProtocolError::TrailingInput(extra.to_owned()));
                }
                let target = match decode_bytes(target)?.as_slice() {
                    [byte] => *byte,
                    _ => return Err(ProtocolError::NotOneByte(target.to_owned())),
                };
                Ok(Command::Fade {
                    addr: address(addr)?,
                    duration_ms: duration
                        .parse()
                        .map_err(|_| ProtocolError::InvalidNumber(duration.to_owned()))?,
                    target,
                })
            }
            'e' | 's' if !rest.trim().is_empty() => {
                Err(ProtocolError::TrailingInput(rest.trim().to_owned()))
            }
            'e' => Ok(Command::ToggleEcho),
            's' => Ok(Command::ToggleFaultSuppression),
            _ => Err(ProtocolError::UnknownCommand(
                line.split_whitespace().next().unwrap_or(line).to_owned(),
            )),
        }
    }
}

fn address(token: &str) -> Result<UniverseAddress, ProtocolError> {
    let addr: usize = token
        .parse()
        .map_err(|_| ProtocolError::InvalidNumber(token.to_owned()))?;
    UniverseAddress::try_from(addr).map_err(|_| ProtocolError::AddressOutOfRange(addr))
}

/// Hex digits fill the frame from address 0. Whitespace between digits is
/// skipped, a NUL character ends the data early. A trailing single digit is
/// the high nibble of its byte.
fn decode_frame(digits: &str) -> Result<Command, ProtocolError> {
    let mut frame = Box::new([0; UNIVERSE_SIZE]);
    let mut count = 0;
    for c in digits.chars() {
        match c {
            '\0' => break,
            c if c.is_ascii_whitespace() => continue,
            c => {
                let value = nibble(c)?;
                let slot = frame
                    .get_mut(count / 2)
                    .ok_or(ProtocolError::FrameOverflow)?;
                if count % 2 == 0 {
                    *slot = value << 4;
                } else {
                    *slot |= value;
                }
                count += 1;
            }
        }
    }
    Ok(Command::Frame(frame))
}
