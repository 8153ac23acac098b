use serde::Serialize;

use super::{Channel, Instrument, ModelError, Target, UniverseAddress, UNIVERSE_SIZE};

/// All instruments of one DMX universe, sorted by address.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Universe {
    instruments: Vec<Instrument>,
}

impl Universe {
    /// Build a universe from instruments in any order.
    ///
    /// Overlapping instruments are not detected, but every channel has to lie
    /// inside the 512 slot universe.
    pub fn new(mut instruments: Vec<Instrument>) -> Result<Self, ModelError> {
        if let Some(i) = instruments.iter().find(|i| i.end() > UNIVERSE_SIZE) {
            Err(ModelError::OutsideUniverse {
                instrument: i.name().clone(),
                addr: i.addr(),
                channels: i.channels().len(),
            })?
        }
        instruments.sort_by_key(|i| i.addr());
        Ok(Self { instruments })
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub(crate) fn instruments_mut(&mut self) -> &mut [Instrument] {
        &mut self.instruments
    }

    /// All instruments whose name starts with `prefix`.
    pub fn instruments_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a Instrument> {
        self.instruments
            .iter()
            .filter(move |i| i.name().starts_with(prefix))
    }

    pub(crate) fn instrument_indices_with_prefix(&self, prefix: &str) -> Vec<usize> {
        self.instruments
            .iter()
            .enumerate()
            .filter(|(_, i)| i.name().starts_with(prefix))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn channel_at(&self, addr: UniverseAddress) -> Result<&Channel, ModelError> {
        self.instruments
            .iter()
            .find(|i| i.covers(addr.get()))
            .and_then(|i| i.channels().get(addr.get() - i.addr()))
            .ok_or(ModelError::NoChannelAt(addr))
    }

    pub fn channel_at_mut(&mut self, addr: UniverseAddress) -> Result<&mut Channel, ModelError> {
        self.instruments
            .iter_mut()
            .find(|i| i.covers(addr.get()))
            .and_then(|i| {
                let offset = addr.get() - i.addr();
                i.channels_mut().get_mut(offset)
            })
            .ok_or(ModelError::NoChannelAt(addr))
    }

    /// Universe addresses of every channel with the given target role, for all
    /// instruments or only those whose name starts with `prefix`.
    pub fn addresses_for(
        &self,
        target: Target,
        prefix: Option<&str>,
    ) -> Result<Vec<UniverseAddress>, ModelError> {
        let mut out = Vec::new();
        for instrument in self
            .instruments
            .iter()
            .filter(|i| prefix.map_or(true, |p| i.name().starts_with(p)))
        {
            for channel in instrument.channels_for(target) {
                out.push(UniverseAddress::try_from(
                    instrument.addr().saturating_add(channel.chan_id()),
                )?);
            }
        }
        Ok(out)
    }
}
