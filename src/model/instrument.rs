use getset::{CopyGetters, Getters};
use serde::Serialize;

use super::{Channel, ChannelKey, ModelError, Selector, Target, ValueKind};

/// A lighting fixture occupying a contiguous run of slots.
///
/// Channel `i` of the instrument sits at universe address `addr + i`.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters, Serialize)]
pub struct Instrument {
    #[getset(get = "pub")]
    name: String,
    #[getset(get_copy = "pub")]
    addr: usize,
    channels: Vec<Channel>,
}

impl Instrument {
    pub fn new<T: Into<String>>(name: T, addr: usize) -> Self {
        Self {
            name: name.into(),
            addr,
            channels: Vec::new(),
        }
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub(crate) fn channels_mut(&mut self) -> &mut [Channel] {
        &mut self.channels
    }

    /// Universe address one past the last channel. Saturates instead of
    /// wrapping, so an absurd `addr` still lands outside the universe.
    pub fn end(&self) -> usize {
        self.addr.saturating_add(self.channels.len())
    }

    pub fn covers(&self, addr: usize) -> bool {
        self.addr <= addr && addr < self.end()
    }

    pub fn channel(&self, key: &ChannelKey) -> Option<&Channel> {
        self.channels
            .iter()
            .find(|c| c.name() == &key.name && c.value_index() == key.value_index)
    }

    /// All channels with exactly this name, i.e. all bytes of one value.
    pub fn channels_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Channel> {
        self.channels.iter().filter(move |c| c.name() == name)
    }

    pub fn channels_for(&self, target: Target) -> impl Iterator<Item = &Channel> {
        self.channels.iter().filter(move |c| c.target() == target)
    }

    /// Indices of the channels matched by `selector`.
    pub fn select(&self, selector: &Selector) -> Vec<usize> {
        self.channels
            .iter()
            .enumerate()
            .filter(|(_, c)| selector.matches(c))
            .map(|(i, _)| i)
            .collect()
    }

    /// Append a channel.
    ///
    /// A channel whose name is already taken by a sibling inherits target and
    /// value kind from the first sibling. Declaring a different one is an
    /// error, just like reusing a name and value index.
    pub fn add_channel(
        &mut self,
        key: ChannelKey,
        target: Option<Target>,
        value_kind: Option<ValueKind>,
    ) -> Result<(), ModelError> {
        if self.channel(&key).is_some() {
            Err(ModelError::DuplicateChannel {
                instrument: self.name.clone(),
                key: key.clone(),
            })?
        }

        let (target, value_kind) = match self.channels_named(&key.name).next() {
            Some(sibling) => {
                let mismatch = |field| ModelError::SiblingMismatch {
                    instrument: self.name.clone(),
                    key: key.clone(),
                    sibling: sibling.key(),
                    field,
                };
                if target.is_some_and(|t| t != sibling.target()) {
                    Err(mismatch("target"))?
                }
                if value_kind.as_ref().is_some_and(|v| v != sibling.value_kind()) {
                    Err(mismatch("value kind"))?
                }
                (sibling.target(), sibling.value_kind().clone())
            }
            None => (target.unwrap_or_default(), value_kind.unwrap_or_default()),
        };

        let chan_id = self.channels.len();
        self.channels
            .push(Channel::new(chan_id, key, target, value_kind));
        Ok(())
    }
}
