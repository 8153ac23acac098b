use std::{
    io::{self, Read},
    os::unix::io::RawFd,
    time::Duration,
};

use tracing::debug;

use super::Input;

/// Standard input switched to non-canonical, non-blocking mode without echo.
///
/// The previous terminal settings and descriptor flags are restored on drop.
/// A process killed by an unhandled signal skips that, so the engine binary
/// turns termination signals into a normal return.
pub struct RawInput {
    fd: RawFd,
    original_termios: Option<libc::termios>,
    original_flags: libc::c_int,
}

impl RawInput {
    pub fn stdin() -> io::Result<Self> {
        Self::new(libc::STDIN_FILENO)
    }

    fn new(fd: RawFd) -> io::Result<Self> {
        // SAFETY: plain libc calls on a descriptor we do not close.
        unsafe {
            let original_termios = if libc::isatty(fd) == 1 {
                let mut termios: libc::termios = std::mem::zeroed();
                if libc::tcgetattr(fd, &mut termios) != 0 {
                    return Err(io::Error::last_os_error());
                }
                let original = termios;
                termios.c_lflag &= !(libc::ICANON | libc::ECHO);
                termios.c_cc[libc::VMIN] = 0;
                termios.c_cc[libc::VTIME] = 0;
                if libc::tcsetattr(fd, libc::TCSANOW, &termios) != 0 {
                    return Err(io::Error::last_os_error());
                }
                Some(original)
            } else {
                None
            };

            let original_flags = libc::fcntl(fd, libc::F_GETFL);
            if original_flags < 0 {
                return Err(io::Error::last_os_error());
            }
            if libc::fcntl(fd, libc::F_SETFL, original_flags | libc::O_NONBLOCK) < 0 {
                return Err(io::Error::last_os_error());
            }

            debug!("input is {}", if original_termios.is_some() { "a terminal" } else { "not a terminal" });
            Ok(Self {
                fd,
                original_termios,
                original_flags,
            })
        }
    }

    pub fn is_tty(&self) -> bool {
        self.original_termios.is_some()
    }

    /// Turn terminal echo on or off. Does nothing if the input is not a
    /// terminal.
    pub fn set_echo(&mut self, on: bool) -> io::Result<()> {
        if !self.is_tty() {
            return Ok(());
        }
        // SAFETY: `self.fd` is a terminal, checked in `new`.
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(self.fd, &mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }
            if on {
                termios.c_lflag |= libc::ECHO;
            } else {
                termios.c_lflag &= !libc::ECHO;
            }
            if libc::tcsetattr(self.fd, libc::TCSANOW, &termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }
}

impl Read for RawInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // SAFETY: `buf` is valid for `buf.len()` bytes.
        let n = unsafe { libc::read(self.fd, buf.as_mut_ptr().cast(), buf.len()) };
        usize::try_from(n).map_err(|_| io::Error::last_os_error())
    }
}

impl Input for RawInput {
    fn wait(&mut self, timeout: Duration) -> io::Result<bool> {
        let mut pollfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);
        // SAFETY: one valid pollfd.
        match unsafe { libc::poll(&mut pollfd, 1, timeout_ms) } {
            n if n < 0 => {
                let e = io::Error::last_os_error();
                if e.kind() == io::ErrorKind::Interrupted {
                    Ok(false)
                } else {
                    Err(e)
                }
            }
            0 => Ok(false),
            _ => Ok(true),
        }
    }
}

impl Drop for RawInput {
    fn drop(&mut self) {
        // SAFETY: restores state saved in `new` on the same descriptor.
        unsafe {
            libc::fcntl(self.fd, libc::F_SETFL, self.original_flags);
            if let Some(original) = &self.original_termios {
                libc::tcsetattr(self.fd, libc::TCSANOW, original);
            }
        }
    }
}
