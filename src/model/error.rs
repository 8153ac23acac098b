use super::{AddressError, ChannelKey, UniverseAddress};

/// Errors of the instrument model.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ModelError {
    #[error("more than one occurrence of channel '{key}' in instrument '{instrument}'")]
    DuplicateChannel { instrument: String, key: ChannelKey },
    #[error(
        "channel '{key}' of instrument '{instrument}' declares a different {field} \
        than its sibling '{sibling}'"
    )]
    SiblingMismatch {
        instrument: String,
        key: ChannelKey,
        sibling: ChannelKey,
        field: &'static str,
    },
    #[error(
        "instrument '{instrument}' at address {addr} with {channels} channels \
        does not fit into the 512 slot universe"
    )]
    OutsideUniverse {
        instrument: String,
        addr: usize,
        channels: usize,
    },
    #[error("no instrument has a channel at universe address {0}")]
    NoChannelAt(UniverseAddress),
    #[error(transparent)]
    Address(#[from] AddressError),
}
