use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use thiserror::Error;

use super::InstructionError;
use crate::Fraction;

/// Instruction names as used by show scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum Verb {
    Load,
    LoadBright,
    LoadDark,
    LoadAndFade,
    FadeTo,
    FadeInstTo,
    Dark,
}

/// A checked instruction with its typed arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Load(PathBuf),
    /// Load, then every master to full.
    LoadBright(PathBuf),
    /// Load, then every master to zero.
    LoadDark(PathBuf),
    /// Load with every master at zero, then fade all masters to full.
    LoadAndFade {
        file: PathBuf,
        duration: FadeDuration,
    },
    FadeTo {
        level: Fraction,
        duration: FadeDuration,
    },
    /// Fade the masters of all instruments whose name starts with `prefix`.
    FadeInstTo {
        prefix: String,
        level: Fraction,
        duration: FadeDuration,
    },
    Dark,
}

impl Instruction {
    pub fn parse(verb: &str, args: &[String]) -> Result<Self, InstructionError> {
        let verb: Verb = verb
            .parse()
            .map_err(|_| InstructionError::UnknownCommand(verb.to_owned()))?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        Ok(match (verb, args.as_slice()) {
            (Verb::Dark, []) => Instruction::Dark,
            (Verb::Dark, _) => Err(InstructionError::TakesNoArguments)?,
            (Verb::Load, [file]) => Instruction::Load(scene_file(file)?),
            (Verb::LoadBright, [file]) => Instruction::LoadBright(scene_file(file)?),
            (Verb::LoadDark, [file]) => Instruction::LoadDark(scene_file(file)?),
            (Verb::Load | Verb::LoadBright | Verb::LoadDark, _) => {
                Err(InstructionError::WrongArguments("a scene file"))?
            }
            (Verb::LoadAndFade, [file, duration]) => Instruction::LoadAndFade {
                file: scene_file(file)?,
                duration: duration.parse()?,
            },
            (Verb::LoadAndFade, _) => Err(InstructionError::WrongArguments("a file and a duration"))?,
            (Verb::FadeTo, [level, duration]) => Instruction::FadeTo {
                level: level.parse()?,
                duration: duration.parse()?,
            },
            (Verb::FadeTo, _) => {
                Err(InstructionError::WrongArguments("a fade value and a duration"))?
            }
            (Verb::FadeInstTo, [prefix, level, duration]) => Instruction::FadeInstTo {
                prefix: (*prefix).to_owned(),
                level: level.parse()?,
                duration: duration.parse()?,
            },
            (Verb::FadeInstTo, _) => Err(InstructionError::WrongArguments(
                "an instrument, fade value, and duration",
            ))?,
        })
    }

    pub fn verb(&self) -> Verb {
        match self {
            Instruction::Load(_) => Verb::Load,
            Instruction::LoadBright(_) => Verb::LoadBright,
            Instruction::LoadDark(_) => Verb::LoadDark,
            Instruction::LoadAndFade { .. } => Verb::LoadAndFade,
            Instruction::FadeTo { .. } => Verb::FadeTo,
            Instruction::FadeInstTo { .. } => Verb::FadeInstTo,
            Instruction::Dark => Verb::Dark,
        }
    }

    /// The scene file this instruction loads, if any.
    pub fn scene_file(&self) -> Option<&Path> {
        match self {
            Instruction::Load(file)
            | Instruction::LoadBright(file)
            | Instruction::LoadDark(file)
            | Instruction::LoadAndFade { file, .. } => Some(file),
            Instruction::FadeTo { .. } | Instruction::FadeInstTo { .. } | Instruction::Dark => None,
        }
    }
}

fn scene_file(arg: &str) -> Result<PathBuf, InstructionError> {
    let path = PathBuf::from(arg);
    if path.is_file() {
        Ok(path)
    } else {
        Err(InstructionError::NotAFile(path))
    }
}

/// Length of a fade, written as `<number><unit>` with unit `ms`, `s` or `m`.
///
/// The number may be fractional, `1.5s` is 1500 ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FadeDuration(Duration);

impl FadeDuration {
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    pub fn get(self) -> Duration {
        self.0
    }

    pub fn as_millis(self) -> u64 {
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for FadeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.as_millis())
    }
}

impl FromStr for FadeDuration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, unit) = s.split_at(s.trim_end_matches(char::is_alphabetic).len());
        let number = number.trim();

        let value: f64 = number
            .parse()
            .map_err(|_| DurationError::NotANumber(number.to_owned()))?;
        if !value.is_finite() {
            Err(DurationError::NotANumber(number.to_owned()))?
        }
        if value < 0.0 {
            Err(DurationError::Negative)?
        }

        let ms_per_unit = match unit {
            "ms" => 1.0,
            "s" => 1_000.0,
            "m" => 60_000.0,
            other => Err(DurationError::UnknownUnit(other.to_owned()))?,
        };
        Ok(Self::from_millis((value * ms_per_unit).round() as u64))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DurationError {
    #[error("Duration must start with a number, got `{0}`.")]
    NotANumber(String),
    #[error("Negative duration not supported.")]
    Negative,
    #[error("Unrecognized unit \"{0}\".")]
    UnknownUnit(String),
}
