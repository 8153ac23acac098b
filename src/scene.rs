//! Symbolic instructions, scene files and the controller driving the engine.

mod check;
mod controller;
mod dmx_ctl;
mod error;
mod instruction;
mod value;

pub use self::{check::*, controller::*, dmx_ctl::*, error::*, instruction::*, value::*};
