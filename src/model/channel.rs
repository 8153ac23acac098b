use getset::{CopyGetters, Getters};
use serde::Serialize;

use super::{ChannelKey, Target, ValueKind};

/// One addressable byte of an instrument.
///
/// Channels that share a `name` but differ in `value_index` are siblings that
/// together carry one wider value, least significant byte at index 0.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters, Serialize)]
pub struct Channel {
    /// Position within the owning instrument's channel list.
    #[getset(get_copy = "pub")]
    chan_id: usize,
    #[getset(get = "pub")]
    name: String,
    #[getset(get_copy = "pub")]
    value_index: u8,
    #[getset(get_copy = "pub")]
    target: Target,
    #[getset(get = "pub")]
    value_kind: ValueKind,
    pub value: u8,
}

impl Channel {
    pub(crate) fn new(chan_id: usize, key: ChannelKey, target: Target, value_kind: ValueKind) -> Self {
        Self {
            chan_id,
            name: key.name,
            value_index: key.value_index,
            target,
            value_kind,
            value: 0,
        }
    }

    pub fn key(&self) -> ChannelKey {
        ChannelKey::new(self.name.as_str(), self.value_index)
    }

    pub fn is_sibling_of(&self, other: &Channel) -> bool {
        self.name == other.name
    }
}
