use std::{
    cell::RefCell,
    io::Write,
    path::Path,
    process::{Child, ChildStdin, Command as Process, Stdio},
};

use tracing::{debug, info, warn};

use super::{CommandSink, EngineProgram, TransportError};
use crate::Command;

/// A running `dmxctl-engine` process, fed through its stdin.
///
/// Dropping it terminates the engine with `SIGTERM` and reaps it.
#[derive(Debug)]
pub struct ChildEngine {
    child: RefCell<Child>,
    stdin: ChildStdin,
}

impl ChildEngine {
    /// Start the engine writing to `device`. Its stdout is discarded, its
    /// diagnostics go to our stderr.
    pub fn spawn(program: &EngineProgram, device: &Path) -> Result<Self, TransportError> {
        let mut cmd = Process::new(program.path());
        cmd.arg(device)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        let mut child = cmd.spawn().map_err(|source| TransportError::Spawn {
            program: program.path().into(),
            source,
        })?;
        let stdin = child.stdin.take().ok_or(TransportError::NoStdin)?;

        info!(
            "started engine {} (pid {}) on {}",
            program.path().display(),
            child.id(),
            device.display()
        );
        Ok(Self {
            child: RefCell::new(child),
            stdin,
        })
    }

    pub fn id(&self) -> u32 {
        self.child.borrow().id()
    }
}

impl CommandSink for ChildEngine {
    fn send(&mut self, command: &Command) -> Result<(), TransportError> {
        debug!("{command}");
        writeln!(self.stdin, "{command}")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn is_alive(&self) -> bool {
        match self.child.try_borrow_mut() {
            Ok(mut child) => matches!(child.try_wait(), Ok(None)),
            Err(_) => true,
        }
    }
}

impl Drop for ChildEngine {
    fn drop(&mut self) {
        let child = self.child.get_mut();
        if let Ok(Some(status)) = child.try_wait() {
            info!("engine already exited with {status}");
            return;
        }
        let Ok(pid) = libc::pid_t::try_from(child.id()) else {
            warn!("engine pid {} out of range, killing it", child.id());
            let _ = child.kill();
            let _ = child.wait();
            return;
        };
        // SAFETY: `pid` is our own child, which has not been reaped yet.
        if unsafe { libc::kill(pid, libc::SIGTERM) } != 0 {
            warn!(
                "could not terminate engine: {}",
                std::io::Error::last_os_error()
            );
        }
        match child.wait() {
            Ok(status) => info!("engine terminated with {status}"),
            Err(e) => warn!("could not reap engine: {e}"),
        }
    }
}
