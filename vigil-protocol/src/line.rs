//! Line framing for the receiving side of the telemetry link
//!
//! The link carries newline-terminated text. A monitor reset mid-line, a
//! cable plugged in late or line noise can leave partial or garbage lines in
//! the stream, so consumers split on `\n` and only treat lines that look like
//! a JSON object as records.

use heapless::Vec;

use crate::encoder::TELEMETRY_CAPACITY;

/// Errors reported while assembling lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded the assembler capacity and was dropped
    LineTooLong,
    /// Line is not valid UTF-8
    InvalidUtf8,
}

/// Splits a byte stream into newline-terminated lines
///
/// Bytes are buffered up to `N`; a longer line is discarded up to its
/// terminating newline and reported as [`LineError::LineTooLong`]. A trailing
/// `\r` is stripped so CRLF senders work too.
#[derive(Debug, Clone)]
pub struct LineAssembler<const N: usize = TELEMETRY_CAPACITY> {
    buffer: Vec<u8, N>,
    /// Dropping bytes until the next newline
    discarding: bool,
    /// Buffer holds a line already handed out
    complete: bool,
}

impl<const N: usize> Default for LineAssembler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineAssembler<N> {
    /// Create a new line assembler
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
            complete: false,
        }
    }

    /// Reset the assembler state
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
        self.complete = false;
    }

    /// Number of bytes buffered for the current line
    pub fn pending(&self) -> usize {
        if self.complete {
            0
        } else {
            self.buffer.len()
        }
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when `byte` completes a line (the newline is
    /// not included), `Ok(None)` when more bytes are needed.
    pub fn feed(&mut self, byte: u8) -> Result<Option<&str>, LineError> {
        if self.complete {
            self.buffer.clear();
            self.complete = false;
        }

        if byte == b'\n' {
            if self.discarding {
                self.discarding = false;
                self.buffer.clear();
                return Err(LineError::LineTooLong);
            }

            self.complete = true;
            let mut line = self.buffer.as_slice();
            if let [rest @ .., b'\r'] = line {
                line = rest;
            }
            return core::str::from_utf8(line)
                .map(Some)
                .map_err(|_| LineError::InvalidUtf8);
        }

        if !self.discarding && self.buffer.push(byte).is_err() {
            self.discarding = true;
            self.buffer.clear();
        }

        Ok(None)
    }

    /// Feed multiple bytes, calling `on_line` for every completed line
    ///
    /// Errors are passed to the callback as well; assembly continues with the
    /// next byte.
    pub fn feed_bytes(&mut self, bytes: &[u8], mut on_line: impl FnMut(Result<&str, LineError>)) {
        for &byte in bytes {
            match self.feed(byte) {
                Ok(Some(line)) => on_line(Ok(line)),
                Ok(None) => {}
                Err(e) => on_line(Err(e)),
            }
        }
    }
}

/// Check whether a line looks like a telemetry record
///
/// Only the object delimiters are checked, which is enough to drop boot
/// noise and placeholders before handing the line to a JSON parser.
pub fn is_record_line(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 2 && line.starts_with('{') && line.ends_with('}')
}
