use super::{ControllerError, InstructionError};

/// Something a show script can send instructions to.
pub trait Controller {
    /// Carry out an instruction. Never has an effect if `verify` rejects it.
    fn execute(&mut self, instruction: &str, args: &[String]) -> Result<(), ControllerError>;

    /// Check that `execute` would succeed, without changing anything.
    fn verify(&self, instruction: &str, args: &[String]) -> Result<(), InstructionError>;

    /// Human-readable status.
    fn state(&self) -> String;

    fn is_alive(&self) -> bool;

    /// The `verify` diagnostic as text, empty if the instruction is fine.
    fn diagnostic(&self, instruction: &str, args: &[String]) -> String {
        match self.verify(instruction, args) {
            Ok(()) => String::new(),
            Err(e) => e.to_string(),
        }
    }
}

/// Accepts every instruction and does nothing, e.g. for sound cues that have
/// no device attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullController;

impl Controller for NullController {
    fn execute(&mut self, _instruction: &str, _args: &[String]) -> Result<(), ControllerError> {
        Ok(())
    }

    fn verify(&self, _instruction: &str, _args: &[String]) -> Result<(), InstructionError> {
        Ok(())
    }

    fn state(&self) -> String {
        "good".into()
    }

    fn is_alive(&self) -> bool {
        true
    }
}
