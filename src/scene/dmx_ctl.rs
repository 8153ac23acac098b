use std::path::Path;

use tracing::{debug, info};

use super::{
    check_scene, Controller, ControllerError, Instruction, InstructionError, SceneError,
    ScenePlan, SetupError,
};
use crate::{
    ChildEngine, Command, CommandSink, EngineProgram, Fraction, Target, TransportError, Universe,
    UniverseAddress,
};

/// Controls one DMX universe through a real-time engine.
///
/// The universe model is the source of truth: every change is made to the
/// model first and then sent to the engine as protocol lines.
#[derive(Debug)]
pub struct DmxCtl<S = ChildEngine> {
    universe: Universe,
    sink: S,
}

impl DmxCtl<ChildEngine> {
    /// Set up from show-script arguments: the output device and the
    /// instrument file. The engine program is found with
    /// [`EngineProgram::resolve`].
    pub fn from_args(args: &[String]) -> Result<Self, SetupError> {
        let [device, instruments] = args else {
            return Err(SetupError::WrongArguments(args.len()));
        };
        let universe = Universe::from_path(instruments)?;
        Self::spawn(&EngineProgram::resolve(), Path::new(device), universe)
    }

    pub fn spawn(
        program: &EngineProgram,
        device: &Path,
        universe: Universe,
    ) -> Result<Self, SetupError> {
        let engine = ChildEngine::spawn(program, device)?;
        info!(
            "controlling {} instruments on {}",
            universe.instruments().len(),
            device.display()
        );
        Ok(Self::new(universe, engine))
    }
}

impl<S: CommandSink> DmxCtl<S> {
    pub fn new(universe: Universe, sink: S) -> Self {
        Self { universe, sink }
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Direct access to the model. Call [`DmxCtl::push_frame`] to send the
    /// changes.
    pub fn universe_mut(&mut self) -> &mut Universe {
        &mut self.universe
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Read a scene file and check it against the loaded instruments.
    pub fn check_scene<P: AsRef<Path>>(&self, file: P) -> Result<ScenePlan, SceneError> {
        let scene = crate::SceneFile::from_path(file)?;
        check_scene(&self.universe, &scene)
    }

    /// Check and apply a scene file to the model. Nothing changes if the check
    /// fails. Returns whether any channel changed.
    pub fn load_scene<P: AsRef<Path>>(&mut self, file: P) -> Result<bool, SceneError> {
        let plan = self.check_scene(file)?;
        Ok(plan.apply(&mut self.universe))
    }

    /// Set one slot immediately.
    pub fn set_channel(&mut self, addr: UniverseAddress, byte: u8) -> Result<(), ControllerError> {
        self.universe.channel_at_mut(addr)?.value = byte;
        self.sink.send(&Command::set(addr, byte))?;
        Ok(())
    }

    /// Fade one slot to `byte`. The model takes the target value right away.
    pub fn fade_channel(
        &mut self,
        addr: UniverseAddress,
        duration_ms: u64,
        byte: u8,
    ) -> Result<(), ControllerError> {
        self.universe.channel_at_mut(addr)?.value = byte;
        self.sink.send(&Command::Fade {
            addr,
            duration_ms,
            target: byte,
        })?;
        Ok(())
    }

    /// Send the whole model as one frame.
    pub fn push_frame(&mut self) -> Result<(), TransportError> {
        self.sink.send(&Command::Frame(Box::new(self.universe.slots())))
    }

    fn prepare(
        &self,
        instruction: &str,
        args: &[String],
    ) -> Result<(Instruction, Option<ScenePlan>), InstructionError> {
        let instruction = Instruction::parse(instruction, args)?;
        let plan = match instruction.scene_file() {
            Some(file) => Some(self.check_scene(file)?),
            None => None,
        };
        Ok((instruction, plan))
    }

    fn fade_masters(
        &mut self,
        prefix: Option<&str>,
        level: Fraction,
        duration_ms: u64,
    ) -> Result<(), ControllerError> {
        for addr in self.universe.addresses_for(Target::Master, prefix)? {
            self.fade_channel(addr, duration_ms, level.byte())?;
        }
        Ok(())
    }
}

impl<S: CommandSink> Controller for DmxCtl<S> {
    fn execute(&mut self, instruction: &str, args: &[String]) -> Result<(), ControllerError> {
        let (prepared, plan) =
            self.prepare(instruction, args)
                .map_err(|source| ControllerError::ContractViolation {
                    instruction: instruction.to_owned(),
                    source,
                })?;
        debug!("executing {prepared:?}");

        if let Some(plan) = plan {
            plan.apply(&mut self.universe);
        }

        match prepared {
            Instruction::Load(_) => self.push_frame()?,
            Instruction::LoadBright(_) => {
                self.universe.set_levels(Target::Master, Fraction::FULL);
                self.push_frame()?;
            }
            Instruction::LoadDark(_) | Instruction::Dark => {
                self.universe.set_levels(Target::Master, Fraction::ZERO);
                self.push_frame()?;
            }
            Instruction::LoadAndFade { duration, .. } => {
                self.universe.set_levels(Target::Master, Fraction::ZERO);
                self.push_frame()?;
                self.fade_masters(None, Fraction::FULL, duration.as_millis())?;
            }
            Instruction::FadeTo { level, duration } => {
                self.fade_masters(None, level, duration.as_millis())?;
            }
            Instruction::FadeInstTo {
                prefix,
                level,
                duration,
            } => {
                self.fade_masters(Some(prefix.as_str()), level, duration.as_millis())?;
            }
        }
        Ok(())
    }

    fn verify(&self, instruction: &str, args: &[String]) -> Result<(), InstructionError> {
        self.prepare(instruction, args).map(|_| ())
    }

    fn state(&self) -> String {
        if self.sink.is_alive() {
            "good".into()
        } else {
            "engine exited".into()
        }
    }

    fn is_alive(&self) -> bool {
        self.sink.is_alive()
    }
}
