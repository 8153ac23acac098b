//! Loading instrument descriptors and scene files from YAML documents.

pub(crate) mod get_yaml_value;

mod error;
mod instruments;
mod scene_file;

pub use self::{error::*, scene_file::*};
