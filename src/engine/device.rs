use std::{
    fs::{File, OpenOptions},
    io,
    os::unix::fs::FileTypeExt,
    path::Path,
};

use super::EngineError;

/// Open a character device for writing frames.
pub fn open_device(path: &Path) -> Result<File, EngineError> {
    let metadata = std::fs::metadata(path).map_err(|source| EngineError::Device {
        path: path.into(),
        source,
    })?;
    if !metadata.file_type().is_char_device() {
        Err(EngineError::NotACharDevice(path.into()))?
    }
    OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|source| EngineError::Device {
            path: path.into(),
            source,
        })
}

/// How a failed device write is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteFault {
    /// I/O error reported by the device itself, fatal unless suppressed.
    DeviceFault,
    /// The descriptor can never be written to.
    Fatal,
    /// Reported, then the next write is attempted as usual.
    Transient,
}

pub fn classify(error: &io::Error) -> WriteFault {
    match error.raw_os_error() {
        Some(libc::EIO) => WriteFault::DeviceFault,
        Some(libc::EBADF | libc::EINVAL | libc::EISDIR) => WriteFault::Fatal,
        _ => WriteFault::Transient,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_write_errors() {
        let os = io::Error::from_raw_os_error;
        assert_eq!(classify(&os(libc::EIO)), WriteFault::DeviceFault);
        assert_eq!(classify(&os(libc::EBADF)), WriteFault::Fatal);
        assert_eq!(classify(&os(libc::EISDIR)), WriteFault::Fatal);
        assert_eq!(classify(&os(libc::EAGAIN)), WriteFault::Transient);
        assert_eq!(
            classify(&io::Error::new(io::ErrorKind::Other, "custom")),
            WriteFault::Transient
        );
    }

    #[test]
    fn only_character_devices_open() {
        assert!(matches!(
            open_device(Path::new("/")),
            Err(EngineError::NotACharDevice(..))
        ));
        assert!(matches!(
            open_device(Path::new("/does/not/exist")),
            Err(EngineError::Device { .. })
        ));
        assert!(open_device(Path::new("/dev/null")).is_ok());
    }
}
