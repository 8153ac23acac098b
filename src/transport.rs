//! Getting protocol lines to the real-time engine.

mod child;
mod error;
mod program;
mod sink;

pub use self::{child::*, error::*, program::*, sink::*};
