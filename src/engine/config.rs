use std::time::Duration;

use derivative::Derivative;
use getset::CopyGetters;

/// Timing and startup flags of the real-time engine.
#[derive(Debug, Clone, PartialEq, Derivative, CopyGetters)]
#[derivative(Default)]
#[getset(get_copy = "pub")]
pub struct EngineConfig {
    /// Longest time between two device writes when nothing changes.
    #[derivative(Default(value = "Duration::from_millis(20)"))]
    refresh: Duration,
    /// How long one loop iteration waits for input.
    #[derivative(Default(value = "Duration::from_millis(5)"))]
    read_window: Duration,
    #[derivative(Default(value = "true"))]
    suppress_device_faults: bool,
    echo: bool,
}

impl EngineConfig {
    pub fn with_refresh(mut self, refresh: Duration) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn with_read_window(mut self, read_window: Duration) -> Self {
        self.read_window = read_window;
        self
    }

    pub fn with_suppress_device_faults(mut self, suppress: bool) -> Self {
        self.suppress_device_faults = suppress;
        self
    }

    pub(crate) fn toggle_echo(&mut self) -> bool {
        self.echo = !self.echo;
        self.echo
    }

    pub(crate) fn toggle_fault_suppression(&mut self) -> bool {
        self.suppress_device_faults = !self.suppress_device_faults;
        self.suppress_device_faults
    }
}
