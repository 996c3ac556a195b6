//! In-memory transport backed by fixed capacity buffers
//!
//! Input is a pre-recorded byte sequence with a read cursor, output collects everything the
//! device writes. Calling [`Loopback::rewind`] replays the recorded input from the start.
use heapless::Vec;

use crate::transport::Transport;

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum LoopbackError {
    InputFull,
    OutputFull,
}

#[cfg(feature = "std")]
impl core::fmt::Display for LoopbackError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            LoopbackError::InputFull => write!(f, "loopback input buffer is full"),
            LoopbackError::OutputFull => write!(f, "loopback output buffer is full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LoopbackError {}

pub struct Loopback<const IN: usize, const OUT: usize> {
    input: Vec<u8, IN>,
    cursor: usize,
    output: Vec<u8, OUT>,
    closed: bool,
}

impl<const IN: usize, const OUT: usize> Loopback<IN, OUT> {
    pub fn new() -> Self {
        Self {
            input: Vec::new(),
            cursor: 0,
            output: Vec::new(),
            closed: false,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoopbackError> {
        let mut loopback = Self::new();
        loopback.feed(bytes)?;
        Ok(loopback)
    }

    /// Appends `bytes` to the recorded input
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), LoopbackError> {
        self.input
            .extend_from_slice(bytes)
            .map_err(|_| LoopbackError::InputFull)
    }

    /// Moves the read cursor back to the first recorded byte
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn written(&self) -> &[u8] {
        &self.output
    }

    pub fn clear_written(&mut self) {
        self.output.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<const IN: usize, const OUT: usize> Default for Loopback<IN, OUT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const IN: usize, const OUT: usize> Transport for Loopback<IN, OUT> {
    type Error = LoopbackError;

    fn bytes_available(&mut self) -> Result<usize, Self::Error> {
        Ok(self.input.len() - self.cursor)
    }

    fn bytes_to_write(&mut self) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        match self.input.get(self.cursor) {
            Some(&b) => {
                self.cursor += 1;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        self.output
            .extend_from_slice(bytes)
            .map_err(|_| LoopbackError::OutputFull)?;
        Ok(bytes.len())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_drains_input() {
        let mut lb = Loopback::<4, 4>::from_bytes(b"ab").unwrap();
        assert_eq!(lb.bytes_available(), Ok(2));
        assert_eq!(lb.read_byte(), Ok(Some(b'a')));
        assert_eq!(lb.read_byte(), Ok(Some(b'b')));
        assert_eq!(lb.read_byte(), Ok(None));
        assert_eq!(lb.bytes_available(), Ok(0));
    }

    #[test]
    fn test_rewind_replays_input() {
        let mut lb = Loopback::<4, 4>::from_bytes(b"xy").unwrap();
        lb.read_byte().unwrap();
        lb.read_byte().unwrap();
        lb.rewind();
        assert_eq!(lb.bytes_available(), Ok(2));
        assert_eq!(lb.read_byte(), Ok(Some(b'x')));
    }

    #[test]
    fn test_input_capacity() {
        assert_eq!(
            Loopback::<2, 4>::from_bytes(b"abc").err(),
            Some(LoopbackError::InputFull)
        );
    }

    #[test]
    fn test_output_capacity() {
        let mut lb = Loopback::<0, 2>::new();
        assert_eq!(lb.write_bytes(b"ab"), Ok(2));
        assert_eq!(lb.write_bytes(b"c"), Err(LoopbackError::OutputFull));
        assert_eq!(lb.written(), b"ab");
    }
}
