//! The line protocol between the scene engine and the real-time engine.
//!
//! One command per line, ASCII, hex bytes written most significant nibble
//! first:
//!
//! | Line                | Meaning                                            |
//! |---------------------|----------------------------------------------------|
//! | `#<hex...>`         | load a full frame, the rest of the universe is 0   |
//! | `@<addr> <hex...>`  | set one or more consecutive slots                  |
//! | `><addr> <ms> <hex>`| fade a slot to a byte over `ms` milliseconds       |
//! | `e`                 | toggle input echo                                  |
//! | `s`                 | toggle suppression of device faults                |

mod command;
mod error;
mod hex;

pub use self::{command::*, error::*};
