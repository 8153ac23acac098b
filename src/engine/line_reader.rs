use std::{
    io::{self, Read},
    time::{Duration, Instant},
};

use tracing::warn;

use super::EngineError;

/// Longest line kept. A full frame with a blank between every byte fits
/// easily, anything longer is discarded up to the next newline.
pub const MAX_LINE_LEN: usize = 4096;

/// Input that can wait a bounded time for data.
pub trait Input: Read {
    /// Wait up to `timeout` until a read would not block. Returns whether
    /// data (or end of input) is ready.
    fn wait(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(true)
    }
}

impl Input for &[u8] {}

impl<T: AsRef<[u8]>> Input for io::Cursor<T> {}

/// Splits input into protocol lines without ever blocking longer than the
/// read window.
#[derive(Debug)]
pub struct LineReader<R> {
    input: R,
    pending: Vec<u8>,
    window: Duration,
    eof_is_closed: bool,
    /// Dropping input until the end of an overlong line.
    discarding: bool,
}

impl<R: Input> LineReader<R> {
    /// With `eof_is_closed`, end of input is fatal. Otherwise it only ends
    /// the current read window, as on a terminal.
    pub fn new(input: R, window: Duration, eof_is_closed: bool) -> Self {
        Self {
            input,
            pending: Vec::new(),
            window,
            eof_is_closed,
            discarding: false,
        }
    }

    pub fn input(&self) -> &R {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut R {
        &mut self.input
    }

    /// Read until a line is complete or the read window is over. Runs of
    /// spaces and tabs come back as a single space.
    pub fn read_line(&mut self) -> Result<Option<String>, EngineError> {
        let deadline = Instant::now() + self.window;
        let mut buf = [0; 512];
        loop {
            if let Some(line) = self.take_line() {
                return Ok(Some(line));
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if !self.input.wait(remaining).map_err(EngineError::Input)? {
                return Ok(None);
            }

            match self.input.read(&mut buf) {
                Ok(0) if self.eof_is_closed => return Err(EngineError::InputClosed),
                Ok(0) => return Ok(None),
                Ok(n) => self.receive(buf.get(..n).unwrap_or_default()),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(None),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(EngineError::Input(e)),
            }

            if remaining.is_zero() {
                return Ok(self.take_line());
            }
        }
    }

    fn receive(&mut self, mut bytes: &[u8]) {
        if self.discarding {
            let Some(end) = bytes.iter().position(|&b| b == b'\n') else {
                return;
            };
            self.discarding = false;
            bytes = bytes.get(end + 1..).unwrap_or_default();
        }
        self.pending.extend_from_slice(bytes);

        let line_start = self
            .pending
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let partial = self.pending.len() - line_start;
        if partial > MAX_LINE_LEN {
            warn!("discarding line longer than {MAX_LINE_LEN} bytes");
            self.pending.truncate(line_start);
            self.discarding = true;
        }
    }

    fn take_line(&mut self) -> Option<String> {
        let end = self.pending.iter().position(|&b| b == b'\n')?;
        let rest = self.pending.split_off(end + 1);
        let raw = std::mem::replace(&mut self.pending, rest);

        let mut line = String::with_capacity(raw.len());
        for c in String::from_utf8_lossy(&raw).chars() {
            match c {
                '\n' | '\r' => {}
                ' ' | '\t' if line.ends_with(' ') => {}
                ' ' | '\t' => line.push(' '),
                c => line.push(c),
            }
        }
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn reader(input: &[u8], eof_is_closed: bool) -> LineReader<&[u8]> {
        LineReader::new(input, Duration::from_millis(5), eof_is_closed)
    }

    #[test]
    fn splits_lines_and_collapses_blanks() -> Result<(), EngineError> {
        let mut r = reader(b"@0  \t3F\n>10 1000 FF\r\npartial", false);
        assert_eq!(r.read_line()?, Some("@0 3F".to_owned()));
        assert_eq!(r.read_line()?, Some(">10 1000 FF".to_owned()));
        assert_eq!(r.read_line()?, None);
        assert_eq!(r.read_line()?, None);
        Ok(())
    }

    #[test]
    fn end_of_pipe_is_fatal() -> Result<(), EngineError> {
        let mut r = reader(b"e\n", true);
        assert_eq!(r.read_line()?, Some("e".to_owned()));
        assert!(matches!(r.read_line(), Err(EngineError::InputClosed)));
        Ok(())
    }

    #[test]
    fn long_lines_span_reads() -> Result<(), EngineError> {
        let frame = format!("#{}\n", "AB".repeat(512));
        let mut r = reader(frame.as_bytes(), false);
        assert_eq!(r.read_line()?.map(|l| l.len()), Some(1025));
        Ok(())
    }

    #[test]
    fn overlong_lines_are_dropped() -> Result<(), EngineError> {
        let mut input = b"@0 01\n".to_vec();
        input.extend(std::iter::repeat(b'A').take(3 * MAX_LINE_LEN));
        input.extend_from_slice(b"\n@1 02\n");
        let mut r = reader(&input, false);

        let mut lines = Vec::new();
        for _ in 0..100 {
            if let Some(line) = r.read_line()? {
                lines.push(line);
            }
        }
        assert_eq!(lines, vec!["@0 01".to_owned(), "@1 02".to_owned()]);
        assert!(r.pending.is_empty());
        Ok(())
    }
}
