use tracing::debug;

use super::TransportError;
use crate::Command;

/// Receives protocol commands. Nothing is ever read back.
pub trait CommandSink {
    fn send(&mut self, command: &Command) -> Result<(), TransportError>;

    /// Whether commands still reach an engine.
    fn is_alive(&self) -> bool {
        true
    }
}

/// Keeps every encoded line in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandLog {
    lines: Vec<String>,
}

impl CommandLog {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Remove and return all lines sent so far.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl CommandSink for CommandLog {
    fn send(&mut self, command: &Command) -> Result<(), TransportError> {
        let line = command.to_string();
        debug!("{line}");
        self.lines.push(line);
        Ok(())
    }
}
