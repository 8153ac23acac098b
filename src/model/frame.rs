use super::Universe;

/// Number of addressable slots in one DMX512 universe.
pub const UNIVERSE_SIZE: usize = 512;

/// The flattened universe, indexed by universe address.
pub type Frame = [u8; UNIVERSE_SIZE];

impl Universe {
    /// Flatten all channel values into one frame.
    ///
    /// Addresses not covered by any instrument are 0.
    pub fn slots(&self) -> Frame {
        let mut frame = [0; UNIVERSE_SIZE];
        for instrument in self.instruments() {
            for (offset, channel) in instrument.channels().iter().enumerate() {
                if let Some(slot) = frame.get_mut(instrument.addr().saturating_add(offset)) {
                    *slot = channel.value;
                }
            }
        }
        frame
    }
}
