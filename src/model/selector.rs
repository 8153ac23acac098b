use std::{convert::Infallible, str::FromStr};

use super::{Channel, Target};

/// Selects channels of an instrument either by target role or by exact name.
///
/// Scene files use the same key for both: a key that names a target role
/// (including the alias `dimmer`) selects by role, anything else by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Target(Target),
    Name(String),
}

impl Selector {
    pub fn matches(&self, channel: &Channel) -> bool {
        match self {
            Selector::Target(target) => channel.target() == *target,
            Selector::Name(name) => channel.name() == name,
        }
    }
}

impl FromStr for Selector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<Target>() {
            Ok(target) => Selector::Target(target),
            Err(_) => Selector::Name(s.to_owned()),
        })
    }
}

impl From<Target> for Selector {
    fn from(value: Target) -> Self {
        Selector::Target(value)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Target(target) => write!(f, "{target}"),
            Selector::Name(name) => write!(f, "{name}"),
        }
    }
}
