use serde_with::SerializeDisplay;

/// Coarse role of a channel, used for bulk operations across instruments, for
/// example "set the master of every instrument to zero".
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    SerializeDisplay,
)]
pub enum Target {
    #[strum(to_string = "master")]
    Master,
    #[strum(to_string = "color")]
    Color,
    #[strum(to_string = "pan")]
    Pan,
    #[strum(to_string = "tilt")]
    Tilt,
    #[strum(to_string = "generic", serialize = "dimmer")]
    #[default]
    Generic,
}
