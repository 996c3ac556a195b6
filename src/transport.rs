//! Transport collaborator the [`Device`](crate::device::Device) talks through
//!
//! A transport only moves bytes: it reports how many are waiting, hands them out one at a time
//! (blocking up to its own timeout) and accepts outgoing bytes. Everything Arduino-flavoured
//! lives in the device layer above it.
use core::time::Duration;
use heapless::Vec;

/// Most bytes a scan may hand back to its source
pub const PUSHBACK_LENGTH: usize = 8;

pub trait Transport {
    type Error;

    /// Number of bytes waiting in the input buffer
    fn bytes_available(&mut self) -> Result<usize, Self::Error>;

    /// Number of bytes still queued in the output buffer
    fn bytes_to_write(&mut self) -> Result<usize, Self::Error>;

    /// Reads a single byte, blocking up to the configured timeout.
    ///
    /// `Ok(None)` means the timeout elapsed without a byte arriving.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Writes `bytes` and returns how many of them were accepted
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, Self::Error>;

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_timeout(&mut self, _timeout: Duration) -> Result<(), Self::Error> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Read side of a transport as seen by the scanner
pub trait ByteSource {
    type Error;

    fn has_bytes(&mut self) -> Result<bool, Self::Error>;
    fn read_one(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Hands `byte` back so the next [`ByteSource::read_one`] returns it again. Returns `false`
    /// when the source cannot take it back.
    fn unread(&mut self, _byte: u8) -> bool {
        false
    }
}

impl<T: Transport> ByteSource for T {
    type Error = T::Error;

    fn has_bytes(&mut self) -> Result<bool, Self::Error> {
        Ok(self.bytes_available()? > 0)
    }

    fn read_one(&mut self) -> Result<Option<u8>, Self::Error> {
        self.read_byte()
    }
}

/// Transport with a small stack of bytes that were read and handed back
///
/// Handed back bytes are delivered again, most recent first, before anything new is read from
/// the transport.
pub struct Pushback<'a, T> {
    pending: &'a mut Vec<u8, PUSHBACK_LENGTH>,
    transport: &'a mut T,
}

impl<'a, T: Transport> Pushback<'a, T> {
    pub fn new(pending: &'a mut Vec<u8, PUSHBACK_LENGTH>, transport: &'a mut T) -> Self {
        Self { pending, transport }
    }
}

impl<'a, T: Transport> ByteSource for Pushback<'a, T> {
    type Error = T::Error;

    fn has_bytes(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pending.is_empty() || self.transport.bytes_available()? > 0)
    }

    fn read_one(&mut self) -> Result<Option<u8>, Self::Error> {
        match self.pending.pop() {
            Some(b) => Ok(Some(b)),
            None => self.transport.read_byte(),
        }
    }

    fn unread(&mut self, byte: u8) -> bool {
        self.pending.push(byte).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loopback::Loopback;

    #[test]
    fn test_transport_cannot_unread() {
        let mut lb = Loopback::<4, 0>::from_bytes(b"a").unwrap();
        assert_eq!(lb.read_one(), Ok(Some(b'a')));
        assert!(!lb.unread(b'a'));
        assert_eq!(lb.has_bytes(), Ok(false));
    }

    #[test]
    fn test_pushback_delivers_unread_bytes_first() {
        let mut lb = Loopback::<4, 0>::from_bytes(b"cd").unwrap();
        let mut pending = Vec::new();
        let mut source = Pushback::new(&mut pending, &mut lb);
        assert!(source.unread(b'b'));
        assert!(source.unread(b'a'));
        let mut seen = Vec::<u8, 4>::new();
        while source.has_bytes().unwrap() {
            seen.push(source.read_one().unwrap().unwrap()).unwrap();
        }
        assert_eq!(&seen[..], b"abcd");
    }

    #[test]
    fn test_pushback_capacity() {
        let mut lb = Loopback::<0, 0>::new();
        let mut pending = Vec::new();
        let mut source = Pushback::new(&mut pending, &mut lb);
        for _ in 0..PUSHBACK_LENGTH {
            assert!(source.unread(0x00));
        }
        assert!(!source.unread(0x00));
    }
}
