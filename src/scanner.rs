//! Delimiter scanner
//!
//! Consumes bytes one at a time from a [`ByteSource`] until the target byte shows up, an optional
//! terminal byte shows up, the optional cap is reached, or the source runs dry. Consumed bytes
//! are gone from the source whatever the outcome.
use crate::error::Error;
use crate::transport::ByteSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TruncateReason {
    CapReached,
    Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanResult {
    /// Target was read; offset counts every consumed byte including the target
    Found(usize),
    /// Terminal byte was read before the target
    NotFound,
    Truncated {
        consumed: usize,
        reason: TruncateReason,
    },
}

impl ScanResult {
    pub fn is_found(&self) -> bool {
        matches!(self, ScanResult::Found(_))
    }

    /// Number of bytes taken from the source, `None` when the terminal byte ended the scan
    pub fn consumed(&self) -> Option<usize> {
        match *self {
            ScanResult::Found(n) => Some(n),
            ScanResult::NotFound => None,
            ScanResult::Truncated { consumed, .. } => Some(consumed),
        }
    }
}

/// Data gathered by a recording scan together with how the scan ended
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Clone, PartialEq)]
pub struct Delimited<T> {
    pub data: T,
    pub outcome: ScanResult,
}

impl<T> Delimited<T> {
    pub fn is_complete(&self) -> bool {
        self.outcome.is_found()
    }
}

/// What a recording sink did with the byte it was handed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recorded {
    Kept,
    /// No room for this byte; it goes back to the source and the scan stops
    Full,
}

#[derive(Clone, Copy)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct Scan {
    target: u8,
    terminal: Option<u8>,
    cap: usize,
}

impl Scan {
    pub const fn new(target: u8) -> Self {
        Self {
            target,
            terminal: None,
            cap: 0,
        }
    }

    /// Stop with [`ScanResult::NotFound`] as soon as `terminal` is read
    pub const fn until(mut self, terminal: u8) -> Self {
        self.terminal = Some(terminal);
        self
    }

    /// Consult at most `cap` bytes, zero means no limit
    pub const fn cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    pub fn run<S: ByteSource>(&self, source: &mut S) -> Result<ScanResult, Error<S::Error>> {
        self.run_into(source, |_| Ok(Recorded::Kept))
    }

    /// Like [`Scan::run`] but hands every consumed byte to `record`, target included.
    ///
    /// A byte the sink reports as [`Recorded::Full`] is unread and the scan ends as
    /// [`TruncateReason::CapReached`]; sources that cannot unread fail with
    /// [`Error::InvalidArgument`].
    pub fn run_into<S, F>(&self, source: &mut S, mut record: F) -> Result<ScanResult, Error<S::Error>>
    where
        S: ByteSource,
        F: FnMut(u8) -> Result<Recorded, Error<S::Error>>,
    {
        let mut consumed = 0;
        while source.has_bytes().map_err(Error::from_transport)? {
            let b = match source.read_one().map_err(Error::from_transport)? {
                Some(b) => b,
                // timed out even though bytes were announced
                None => break,
            };
            if record(b)? == Recorded::Full {
                if !source.unread(b) {
                    return Err(Error::InvalidArgument);
                }
                return Ok(ScanResult::Truncated {
                    consumed,
                    reason: TruncateReason::CapReached,
                });
            }
            consumed += 1;

            if b == self.target {
                return Ok(ScanResult::Found(consumed));
            }
            if self.terminal == Some(b) {
                return Ok(ScanResult::NotFound);
            }
            if self.cap > 0 && consumed >= self.cap {
                return Ok(ScanResult::Truncated {
                    consumed,
                    reason: TruncateReason::CapReached,
                });
            }
        }
        Ok(ScanResult::Truncated {
            consumed,
            reason: TruncateReason::Exhausted,
        })
    }
}

/// Reads exactly `buf.len()` bytes, failing with [`Error::InsufficientData`] if the source
/// empties first
pub fn read_exact<S: ByteSource>(source: &mut S, buf: &mut [u8]) -> Result<usize, Error<S::Error>> {
    let wanted = buf.len();
    for (i, slot) in buf.iter_mut().enumerate() {
        if !source.has_bytes().map_err(Error::from_transport)? {
            log::debug!("source ran dry after {} of {} bytes", i, wanted);
            return Err(Error::InsufficientData);
        }
        *slot = source
            .read_one()
            .map_err(Error::from_transport)?
            .ok_or(Error::InsufficientData)?;
    }
    Ok(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loopback::{Loopback, LoopbackError};
    use crate::transport::{Pushback, Transport};
    use rand::{thread_rng, Rng};

    type Source = Loopback<64, 0>;

    fn source(bytes: &[u8]) -> Source {
        Source::from_bytes(bytes).unwrap()
    }

    #[test]
    fn test_found_counts_target() {
        let mut src = source(b"abc");
        assert_eq!(Scan::new(b'b').run(&mut src), Ok(ScanResult::Found(2)));
        assert_eq!(src.bytes_available(), Ok(1));
    }

    #[test]
    fn test_empty_source_is_not_an_error() {
        let mut src = source(b"");
        assert_eq!(
            Scan::new(b'x').run(&mut src),
            Ok(ScanResult::Truncated {
                consumed: 0,
                reason: TruncateReason::Exhausted
            })
        );
    }

    #[test]
    fn test_cap_stops_before_blocking() {
        let mut src = source(b"AB");
        assert_eq!(
            Scan::new(b'C').cap(2).run(&mut src),
            Ok(ScanResult::Truncated {
                consumed: 2,
                reason: TruncateReason::CapReached
            })
        );
    }

    #[test]
    fn test_target_on_cap_boundary_is_found() {
        let mut src = source(b"ABC");
        assert_eq!(Scan::new(b'C').cap(3).run(&mut src), Ok(ScanResult::Found(3)));
    }

    #[test]
    fn test_zero_cap_means_unlimited() {
        let mut src = source(b"0123456789x");
        assert_eq!(Scan::new(b'x').cap(0).run(&mut src), Ok(ScanResult::Found(11)));
    }

    #[test]
    fn test_terminal_before_target() {
        let mut src = source(b"ab;c");
        assert_eq!(
            Scan::new(b'c').until(b';').run(&mut src),
            Ok(ScanResult::NotFound)
        );
    }

    #[test]
    fn test_record_includes_target() {
        let mut src = source(b"OK\nrest");
        let mut seen = heapless::Vec::<u8, 8>::new();
        let res = Scan::new(b'\n').run_into(&mut src, |b| {
            seen.push(b).map_err(|_| Error::InvalidArgument)?;
            Ok(Recorded::Kept)
        });
        assert_eq!(res, Ok(ScanResult::Found(3)));
        assert_eq!(&seen[..], b"OK\n");
    }

    #[test]
    fn test_full_sink_without_unread_is_invalid_argument() {
        let mut src = source(b"abcdef");
        let mut seen = heapless::Vec::<u8, 2>::new();
        let res = Scan::new(b'f').run_into(&mut src, |b| match seen.push(b) {
            Ok(()) => Ok(Recorded::Kept),
            Err(_) => Ok(Recorded::Full),
        });
        assert_eq!(res, Err(Error::InvalidArgument));
    }

    #[test]
    fn test_full_sink_hands_byte_back() {
        let mut lb = source(b"abcdef");
        let mut pending = heapless::Vec::new();
        let mut src = Pushback::new(&mut pending, &mut lb);
        let mut seen = heapless::Vec::<u8, 2>::new();
        let res = Scan::new(b'f').run_into(&mut src, |b| match seen.push(b) {
            Ok(()) => Ok(Recorded::Kept),
            Err(_) => Ok(Recorded::Full),
        });
        assert_eq!(
            res,
            Ok(ScanResult::Truncated {
                consumed: 2,
                reason: TruncateReason::CapReached
            })
        );
        assert_eq!(&seen[..], b"ab");
        assert_eq!(src.read_one(), Ok(Some(b'c')));
    }

    #[test]
    fn test_sink_error_ends_scan() {
        let mut src = source(b"ab\xffc");
        let res = Scan::new(b'c').run_into(&mut src, |b| {
            if b.is_ascii() {
                Ok(Recorded::Kept)
            } else {
                Err(Error::Decode)
            }
        });
        assert_eq!(res, Err(Error::Decode));
    }

    #[test]
    fn test_read_exact() {
        let mut src = source(b"abcd");
        let mut buf = [0u8; 3];
        assert_eq!(read_exact(&mut src, &mut buf), Ok(3));
        assert_eq!(&buf, b"abc");
        let mut buf = [0u8; 2];
        assert_eq!(
            read_exact(&mut src, &mut buf),
            Err(Error::<LoopbackError>::InsufficientData)
        );
    }

    #[test]
    fn test_find_iff_target_in_prefix() {
        let mut rng = thread_rng();
        for _ in 0..200 {
            let len = rng.gen_range(0, 64);
            let mut data = [0u8; 64];
            for b in data[..len].iter_mut() {
                *b = rng.gen_range(b'a', b'f');
            }
            let cap = rng.gen_range(0, 70);
            let target = rng.gen_range(b'a', b'g');

            let limit = if cap == 0 { len } else { cap.min(len) };
            let expected = data[..limit].contains(&target);

            let mut src = source(&data[..len]);
            let res = Scan::new(target).cap(cap).run(&mut src).unwrap();
            assert_eq!(res.is_found(), expected, "data {:?} cap {}", &data[..len], cap);
        }
    }

    #[test]
    fn test_terminal_first_never_found() {
        let mut rng = thread_rng();
        for _ in 0..200 {
            let len = rng.gen_range(1, 64);
            let mut data = [0u8; 64];
            for b in data[..len].iter_mut() {
                *b = rng.gen_range(b'a', b'e');
            }
            let target = b'a';
            let terminal = b'b';
            let t_pos = data[..len].iter().position(|&b| b == target);
            let term_pos = data[..len].iter().position(|&b| b == terminal);

            let mut src = source(&data[..len]);
            let res = Scan::new(target).until(terminal).run(&mut src).unwrap();
            match (t_pos, term_pos) {
                (Some(t), Some(term)) if term < t => assert_eq!(res, ScanResult::NotFound),
                (Some(t), _) => assert_eq!(res, ScanResult::Found(t + 1)),
                (None, Some(_)) => assert_eq!(res, ScanResult::NotFound),
                (None, None) => assert!(!res.is_found()),
            }
        }
    }
}
