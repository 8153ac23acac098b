mod address;
mod channel;
mod channel_key;
mod error;
mod fraction;
mod frame;
mod instrument;
mod levels;
mod selector;
mod target;
mod universe;
mod value_kind;

pub use address::*;
pub use channel::*;
pub use channel_key::*;
pub use error::*;
pub use fraction::*;
pub use frame::*;
pub use instrument::*;
pub use levels::*;
pub use selector::*;
pub use target::*;
pub use universe::*;
pub use value_kind::*;
