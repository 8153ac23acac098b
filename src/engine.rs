//! The real-time engine: owns the live slot buffer, applies protocol lines,
//! runs fades and writes frames to the output device.

mod config;
mod device;
mod error;
mod fader;
mod line_reader;
mod raw_input;

use std::{
    collections::BTreeMap,
    io::Write,
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

use tracing::{debug, info, warn};

pub use self::{config::*, device::*, error::*, fader::*, line_reader::*, raw_input::*};
use crate::{Command, ProtocolError, UniverseAddress, UNIVERSE_SIZE};

/// Length of the frame written to the device: start code plus 512 slots.
pub const WIRE_FRAME_SIZE: usize = UNIVERSE_SIZE + 1;

/// The live buffer and fader table, writing to `device`.
///
/// Time is passed in explicitly, the engine never reads the clock itself.
#[derive(Debug)]
pub struct Engine<D> {
    device: D,
    slots: [u8; WIRE_FRAME_SIZE],
    faders: BTreeMap<UniverseAddress, Fader>,
    dirty: bool,
    last_write: Option<Instant>,
    config: EngineConfig,
}

impl<D: Write> Engine<D> {
    pub fn new(device: D, config: EngineConfig) -> Self {
        Self {
            device,
            slots: [0; WIRE_FRAME_SIZE],
            faders: BTreeMap::new(),
            dirty: true,
            last_write: None,
            config,
        }
    }

    /// The wire frame, start code at index 0.
    pub fn slots(&self) -> &[u8; WIRE_FRAME_SIZE] {
        &self.slots
    }

    pub fn slot(&self, addr: UniverseAddress) -> u8 {
        self.slots.get(addr.wire_slot()).copied().unwrap_or_default()
    }

    pub fn fader(&self, addr: UniverseAddress) -> Option<&Fader> {
        self.faders.get(&addr)
    }

    pub fn fader_count(&self) -> usize {
        self.faders.len()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Decode and apply one protocol line. Blank lines are ignored. A line
    /// that does not decode changes nothing.
    pub fn handle_line(&mut self, line: &str, now: Instant) -> Result<(), ProtocolError> {
        if line.trim().is_empty() {
            return Ok(());
        }
        let command: Command = line.parse()?;
        self.apply(command, now);
        Ok(())
    }

    pub fn apply(&mut self, command: Command, now: Instant) {
        debug!("{command}");
        match command {
            Command::Frame(frame) => {
                if let Some(universe) = self.slots.get_mut(1..) {
                    universe.copy_from_slice(frame.as_slice());
                }
                self.faders.clear();
            }
            Command::Set { addr, bytes } => {
                for (offset, byte) in bytes.into_iter().enumerate() {
                    if let Ok(addr) = addr.offset(offset) {
                        self.set_slot(addr, byte);
                        self.faders.remove(&addr);
                    }
                }
            }
            Command::Fade {
                addr,
                duration_ms,
                target,
            } => {
                let from = self.slot(addr);
                match Fader::new(now, from, target, Duration::from_millis(duration_ms)) {
                    Some(fader) => {
                        self.faders.insert(addr, fader);
                    }
                    None => {
                        self.faders.remove(&addr);
                        self.set_slot(addr, target);
                    }
                }
            }
            Command::ToggleEcho => {
                let echo = self.config.toggle_echo();
                info!("echo {}", if echo { "on" } else { "off" });
            }
            Command::ToggleFaultSuppression => {
                let suppress = self.config.toggle_fault_suppression();
                info!(
                    "device faults {}",
                    if suppress { "suppressed" } else { "reported" }
                );
            }
        }
        self.dirty = true;
    }

    fn set_slot(&mut self, addr: UniverseAddress, byte: u8) {
        if let Some(slot) = self.slots.get_mut(addr.wire_slot()) {
            *slot = byte;
        }
    }

    /// Move every fader to `now`. Faders whose slot reached the target are
    /// removed.
    pub fn advance_faders(&mut self, now: Instant) {
        let slots = &mut self.slots;
        let mut changed = false;
        self.faders.retain(|addr, fader| {
            let Some(slot) = slots.get_mut(addr.wire_slot()) else {
                return false;
            };
            if *slot == fader.target() {
                return false;
            }
            let next = fader.advance(*slot, now);
            changed |= next != *slot;
            *slot = next;
            next != fader.target()
        });
        self.dirty |= changed;
    }

    /// Write the frame if it changed or the refresh interval passed. Returns
    /// whether a write was attempted.
    pub fn flush(&mut self, now: Instant) -> Result<bool, EngineError> {
        let due = self.dirty
            || self
                .last_write
                .map_or(true, |t| now.saturating_duration_since(t) >= self.config.refresh());
        if !due {
            return Ok(false);
        }
        self.dirty = false;
        self.last_write = Some(now);

        if let Err(e) = self.device.write_all(&self.slots) {
            match classify(&e) {
                WriteFault::DeviceFault if self.config.suppress_device_faults() => {}
                WriteFault::DeviceFault => Err(EngineError::DeviceFault(e))?,
                WriteFault::Fatal => Err(EngineError::Descriptor(e))?,
                WriteFault::Transient => warn!("device write failed: {e}"),
            }
        }
        Ok(true)
    }

    /// One loop iteration: apply `line` if there is one, advance faders and
    /// write the frame if due.
    pub fn step(&mut self, line: Option<&str>, now: Instant) -> Result<(), EngineError> {
        if let Some(line) = line {
            if let Err(e) = self.handle_line(line, now) {
                warn!("{e}: {line:?}");
            }
        }
        self.advance_faders(now);
        self.flush(now)?;
        Ok(())
    }

    /// Run until `stop` is raised, the input closes or a fatal error occurs.
    ///
    /// `stop` is checked once per iteration, so it takes at most one read
    /// window to return after it is set.
    pub fn run<R: Input>(
        &mut self,
        input: &mut LineReader<R>,
        stop: &AtomicBool,
        mut on_echo: impl FnMut(&mut R, bool),
    ) -> Result<(), EngineError> {
        info!(
            "running, refresh {:?}, read window {:?}",
            self.config.refresh(),
            self.config.read_window()
        );
        while !stop.load(Ordering::SeqCst) {
            let line = input.read_line()?;
            let echo = self.config.echo();
            self.step(line.as_deref(), Instant::now())?;
            if self.config.echo() != echo {
                on_echo(input.input_mut(), self.config.echo());
            }
        }
        info!("stopping");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn addr(a: u16) -> UniverseAddress {
        a.try_into().unwrap()
    }

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn engine() -> Engine<Vec<u8>> {
        Engine::new(Vec::new(), EngineConfig::default())
    }

    #[test]
    fn set_lands_in_wire_slot() {
        let mut e = engine();
        let t0 = Instant::now();
        e.handle_line("@0 3F", t0).unwrap();
        assert_eq!(e.slots()[..3], [0, 0x3F, 0]);
        e.handle_line("@510 0102", t0).unwrap();
        assert_eq!(e.slots()[511..], [1, 2]);
    }

    #[test]
    fn bad_lines_change_nothing() {
        let mut e = engine();
        let t0 = Instant::now();
        e.handle_line("@5 77", t0).unwrap();
        let before = *e.slots();
        for line in ["@512 01", "@1 0G", ">1 10 FFF", "#12G", "x", "@511 0102"] {
            assert!(e.handle_line(line, t0).is_err(), "{line}");
            assert_eq!(e.slots(), &before, "{line}");
        }
        assert!(e.handle_line("   ", t0).is_ok());
        assert_eq!(e.slots()[0], 0);
    }

    #[test]
    fn frame_zero_fills_the_tail() {
        let mut e = engine();
        let t0 = Instant::now();
        e.handle_line("@100 FF", t0).unwrap();
        e.handle_line("#0102", t0).unwrap();
        assert_eq!(e.slots()[..4], [0, 1, 2, 0]);
        assert!(e.slots()[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn fade_runs_to_target_and_is_removed() {
        let mut e = engine();
        let t0 = Instant::now();
        e.handle_line(">10 1000 FF", t0).unwrap();
        assert_eq!(e.fader(addr(10)).map(Fader::velocity), Some(0.255));

        e.advance_faders(t0 + ms(500));
        let half = e.slot(addr(10));
        assert!(0 < half && half <= 0x80, "{half}");
        assert_eq!(e.slots()[11], half);

        e.advance_faders(t0 + ms(1000));
        assert_eq!(e.slot(addr(10)), 0xFF);
        assert_eq!(e.fader_count(), 0);
    }

    #[test]
    fn fade_special_cases() {
        let mut e = engine();
        let t0 = Instant::now();
        // zero velocity
        e.handle_line(">3 100 00", t0).unwrap();
        assert_eq!(e.fader_count(), 0);
        // zero duration sets at once
        e.handle_line(">3 0 80", t0).unwrap();
        assert_eq!(e.slot(addr(3)), 0x80);
        assert_eq!(e.fader_count(), 0);
        // a new fade replaces the old one
        e.handle_line(">3 100 FF", t0).unwrap();
        e.handle_line(">3 100 00", t0).unwrap();
        assert_eq!(e.fader(addr(3)).map(Fader::target), Some(0));
        assert_eq!(e.fader_count(), 1);
        // setting the slot ends the fade
        e.handle_line("@3 10", t0).unwrap();
        assert_eq!(e.fader_count(), 0);
    }

    #[test]
    fn writes_are_rate_limited() -> Result<(), EngineError> {
        let mut e = engine();
        let t0 = Instant::now();
        assert!(e.flush(t0)?);
        assert!(!e.flush(t0 + ms(5))?);
        assert!(!e.flush(t0 + ms(19))?);
        assert!(e.flush(t0 + ms(20))?);

        e.step(Some("@0 01"), t0 + ms(21))?;
        assert_eq!(e.device().len(), 3 * WIRE_FRAME_SIZE);
        assert_eq!(e.device()[2 * WIRE_FRAME_SIZE + 1], 1);

        e.step(None, t0 + ms(30))?;
        assert_eq!(e.device().len(), 3 * WIRE_FRAME_SIZE);
        Ok(())
    }

    #[test]
    fn toggles() {
        let mut e = engine();
        let t0 = Instant::now();
        e.handle_line("e", t0).unwrap();
        assert!(e.config().echo());
        e.handle_line("s", t0).unwrap();
        assert!(!e.config().suppress_device_faults());
    }

    struct Failing(i32);

    impl Write for Failing {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from_raw_os_error(self.0))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn device_faults() {
        let t0 = Instant::now();
        let mut e = Engine::new(Failing(libc::EIO), EngineConfig::default());
        assert!(e.flush(t0).is_ok());
        e.handle_line("s", t0).unwrap();
        assert!(matches!(e.flush(t0), Err(EngineError::DeviceFault(..))));

        let mut e = Engine::new(Failing(libc::EBADF), EngineConfig::default());
        assert!(matches!(e.flush(t0), Err(EngineError::Descriptor(..))));

        let mut e = Engine::new(Failing(libc::EAGAIN), EngineConfig::default());
        assert!(e.flush(t0).is_ok());
    }

    #[test]
    fn run_returns_once_stopped() {
        let mut e = engine();
        let stop = AtomicBool::new(false);
        let mut input = LineReader::new(&b"@0 01\ne\n@1 02\n"[..], ms(5), false);

        let mut toggles = Vec::new();
        let result = e.run(&mut input, &stop, |_, echo| {
            toggles.push(echo);
            stop.store(true, Ordering::SeqCst);
        });
        assert!(result.is_ok());
        assert_eq!(toggles, [true]);
        assert_eq!(e.slots()[..3], [0, 1, 0]);
    }

    #[test]
    fn run_reports_closed_input() {
        let mut e = engine();
        let stop = AtomicBool::new(false);
        let mut input = LineReader::new(&b"@0 01\n"[..], ms(5), true);
        let result = e.run(&mut input, &stop, |_, _| {});
        assert!(matches!(result, Err(EngineError::InputClosed)));
        assert_eq!(e.slot(addr(0)), 1);
    }
}
