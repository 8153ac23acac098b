#![warn(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

// the real-time engine is only needed by the `dmxctl-engine` binary and tests,
// so it is not re-exported
pub mod engine;

// these modules are re-exported as they form the main part of the API
mod model;
pub mod parse;
pub mod protocol;
pub mod scene;
pub mod transport;

pub use model::*;
pub use parse::*;
pub use protocol::*;
pub use scene::*;
pub use transport::*;
