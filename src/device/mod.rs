//! Arduino-style `Serial` facade
//!
//! [`Device`] wraps a [`Transport`] and offers the familiar `read`, `readBytes`,
//! `readStringUntil`, `find`, `print`, `println` and `write` calls. Each call validates its
//! arguments and passes straight through to the transport; the search oriented calls are driven
//! by the [`Scan`] loop.
//!
//! ```ignore - needs a board attached
//! let mut device = Device::open(&PortConfig::new("/dev/ttyACM0"))?;
//! device.println("ping", None)?;
//! let reply = device.read_string_until::<64>('\n')?;
//! ```
use core::time::Duration;
use heapless::{String, Vec};

use crate::error::Error;
use crate::format::{self, Base, Encoding, UnknownBase, Value};
use crate::scanner::{self, Delimited, Recorded, Scan, ScanResult};
use crate::transport::{ByteSource, Pushback, Transport, PUSHBACK_LENGTH};

pub mod command;

/// Line terminator appended by `println` and consumed by `read_string`
pub const LINE_TERMINATOR: u8 = b'\n';
const ENCODE_CHUNK_LENGTH: usize = 32;

/// Single value accepted by [`Device::write`]
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum WriteValue<'a> {
    Byte(u8),
    Text(&'a str),
}

impl From<u8> for WriteValue<'_> {
    fn from(b: u8) -> Self {
        WriteValue::Byte(b)
    }
}

impl<'a> From<&'a str> for WriteValue<'a> {
    fn from(s: &'a str) -> Self {
        WriteValue::Text(s)
    }
}

/// Positional argument of the variadic [`Device::write_args`]
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum WriteArg<'a> {
    Byte(u8),
    Text(&'a str),
    Buffer(&'a [u8]),
    Length(usize),
}

impl<E> From<UnknownBase> for Error<E> {
    fn from(_: UnknownBase) -> Error<E> {
        Error::InvalidArgument
    }
}

/// Delimiters and targets have to fit in a single byte
pub fn ascii_byte<E>(c: char) -> Result<u8, Error<E>> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(Error::InvalidArgument)
    }
}

pub struct Device<T: Transport> {
    transport: T,
    encoding: Encoding,
    ready: bool,
    /// Bytes a string read had no room for, delivered before the transport's
    pending: Vec<u8, PUSHBACK_LENGTH>,
}

impl<T: Transport> Device<T> {
    pub fn new(transport: T) -> Self {
        Self::with_encoding(transport, Encoding::default())
    }

    pub fn with_encoding(transport: T, encoding: Encoding) -> Self {
        Self {
            transport,
            encoding,
            ready: true,
            pending: Vec::new(),
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    /// `false` once [`Device::end`] was called
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    fn ready_transport(&mut self) -> Result<&mut T, Error<T::Error>> {
        if self.ready {
            Ok(&mut self.transport)
        } else {
            Err(Error::Closed)
        }
    }

    fn source(&mut self) -> Result<Pushback<'_, T>, Error<T::Error>> {
        if self.ready {
            Ok(Pushback::new(&mut self.pending, &mut self.transport))
        } else {
            Err(Error::Closed)
        }
    }

    /// Closes the transport, further I/O fails with [`Error::Closed`]
    pub fn end(&mut self) -> Result<(), Error<T::Error>> {
        if !self.ready {
            return Ok(());
        }
        self.ready = false;
        self.pending.clear();
        self.transport.close().map_err(Error::Transport)?;
        log::info!("device ended");
        Ok(())
    }

    pub fn available(&mut self) -> Result<usize, Error<T::Error>> {
        let waiting = self
            .ready_transport()?
            .bytes_available()
            .map_err(Error::Transport)?;
        Ok(self.pending.len() + waiting)
    }

    pub fn available_for_writing(&mut self) -> Result<usize, Error<T::Error>> {
        self.ready_transport()?
            .bytes_to_write()
            .map_err(Error::Transport)
    }

    pub fn flush(&mut self) -> Result<(), Error<T::Error>> {
        self.ready_transport()?.flush().map_err(Error::Transport)
    }

    pub fn set_timeout(&mut self, timeout: Duration) -> Result<(), Error<T::Error>> {
        self.ready_transport()?
            .set_timeout(timeout)
            .map_err(Error::Transport)
    }

    /// Reads one byte
    pub fn read(&mut self) -> Result<u8, Error<T::Error>> {
        let mut byte = [0u8; 1];
        scanner::read_exact(&mut self.source()?, &mut byte)?;
        Ok(byte[0])
    }

    /// Reads exactly `length` bytes into the front of `buf`
    pub fn read_bytes(&mut self, buf: &mut [u8], length: usize) -> Result<usize, Error<T::Error>> {
        if length > buf.len() {
            return Err(Error::InvalidArgument);
        }
        scanner::read_exact(&mut self.source()?, &mut buf[..length])
    }

    /// Reads one line and returns it without surrounding whitespace.
    ///
    /// The outcome tells whether the whole line fit: a line longer than `N` comes back
    /// truncated and the rest of it is left for the next read.
    pub fn read_string<const N: usize>(&mut self) -> Result<Delimited<String<N>>, Error<T::Error>> {
        if self.available()? == 0 {
            return Err(Error::InsufficientData);
        }
        let line = self.read_string_until::<N>(LINE_TERMINATOR as char)?;
        let mut data = String::new();
        data.push_str(line.data.trim())
            .map_err(|_| Error::InvalidArgument)?;
        Ok(Delimited {
            data,
            outcome: line.outcome,
        })
    }

    /// Reads text up to and including `delimiter`, or until `N` bytes of text were decoded or
    /// the source ran dry.
    ///
    /// A char that does not fit in the remaining capacity is left unread and the outcome is
    /// `Truncated { reason: CapReached }`, the next read starts with it.
    pub fn read_string_until<const N: usize>(
        &mut self,
        delimiter: char,
    ) -> Result<Delimited<String<N>>, Error<T::Error>> {
        if N == 0 {
            return Err(Error::InvalidArgument);
        }
        let delimiter = ascii_byte::<T::Error>(delimiter)?;
        let line = match self.encoding {
            Encoding::Utf8 => self.read_utf8_until(delimiter)?,
            encoding => {
                let mut data = String::<N>::new();
                let outcome = Scan::new(delimiter)
                    .cap(N)
                    .run_into(&mut self.source()?, |b| {
                        let c = encoding.decode_byte(b).ok_or(Error::Decode)?;
                        Ok(match data.push(c) {
                            Ok(()) => Recorded::Kept,
                            Err(_) => Recorded::Full,
                        })
                    })?;
                Delimited { data, outcome }
            }
        };
        log::debug!("read_string_until: {:?}", line.outcome);
        Ok(line)
    }

    fn read_utf8_until<const N: usize>(
        &mut self,
        delimiter: u8,
    ) -> Result<Delimited<String<N>>, Error<T::Error>> {
        let mut raw = Vec::<u8, N>::new();
        let mut source = self.source()?;
        let outcome = Scan::new(delimiter).cap(N).run_into(&mut source, |b| {
            Ok(match raw.push(b) {
                Ok(()) => Recorded::Kept,
                Err(_) => Recorded::Full,
            })
        })?;

        let valid = match core::str::from_utf8(&raw) {
            Ok(_) => raw.len(),
            // a char cut short by the cap or by the source running dry
            Err(e) if e.error_len().is_none() && !outcome.is_found() => e.valid_up_to(),
            Err(_) => return Err(Error::Decode),
        };
        let cut = raw.len() - valid;
        for &b in raw[valid..].iter().rev() {
            if !source.unread(b) {
                return Err(Error::InvalidArgument);
            }
        }
        let outcome = match outcome {
            ScanResult::Truncated { consumed, reason } => ScanResult::Truncated {
                consumed: consumed - cut,
                reason,
            },
            outcome => outcome,
        };

        let text = core::str::from_utf8(&raw[..valid]).map_err(|_| Error::Decode)?;
        let mut data = String::new();
        data.push_str(text).map_err(|_| Error::InvalidArgument)?;
        Ok(Delimited { data, outcome })
    }

    /// Reads bytes up to and including `delimiter` into `buf`, consulting at most `length`
    /// bytes (`0` means the whole of `buf`)
    pub fn read_bytes_until(
        &mut self,
        delimiter: u8,
        buf: &mut [u8],
        length: usize,
    ) -> Result<ScanResult, Error<T::Error>> {
        if buf.is_empty() || length > buf.len() {
            return Err(Error::InvalidArgument);
        }
        let cap = if length == 0 { buf.len() } else { length };
        let mut filled = 0;
        let outcome = Scan::new(delimiter)
            .cap(cap)
            .run_into(&mut self.source()?, |b| {
                let slot = buf.get_mut(filled).ok_or(Error::InvalidArgument)?;
                *slot = b;
                filled += 1;
                Ok(Recorded::Kept)
            })?;
        log::debug!("read_bytes_until: {:?}", outcome);
        Ok(outcome)
    }

    /// Consumes input until `target` is read, at most `cap` bytes (`0` means no limit)
    pub fn find(&mut self, target: u8, cap: usize) -> Result<bool, Error<T::Error>> {
        let outcome = Scan::new(target).cap(cap).run(&mut self.source()?)?;
        log::debug!("find {:#04x}: {:?}", target, outcome);
        Ok(outcome.is_found())
    }

    /// Like [`Device::find`] but gives up as soon as `terminal` is read
    pub fn find_until(&mut self, target: u8, terminal: u8) -> Result<bool, Error<T::Error>> {
        let outcome = Scan::new(target)
            .until(terminal)
            .run(&mut self.source()?)?;
        log::debug!("find_until {:#04x}/{:#04x}: {:?}", target, terminal, outcome);
        Ok(outcome.is_found())
    }

    pub fn write<'a>(&mut self, value: impl Into<WriteValue<'a>>) -> Result<usize, Error<T::Error>> {
        match value.into() {
            WriteValue::Byte(b) => self.write_all(&[b]),
            WriteValue::Text(text) => self.write_text(text),
        }
    }

    /// Writes the first `length` bytes of `buf`
    pub fn write_buffer(&mut self, buf: &[u8], length: usize) -> Result<usize, Error<T::Error>> {
        if length > buf.len() {
            return Err(Error::InsufficientData);
        }
        self.write_all(&buf[..length])
    }

    /// Variadic form of `write`: a single byte/text/buffer, or a buffer (or text) followed by
    /// an explicit length
    pub fn write_args(&mut self, args: &[WriteArg<'_>]) -> Result<usize, Error<T::Error>> {
        match *args {
            [WriteArg::Byte(b)] => self.write(b),
            [WriteArg::Text(text)] => self.write(text),
            [WriteArg::Buffer(buf)] => self.write_buffer(buf, buf.len()),
            [WriteArg::Buffer(buf), WriteArg::Length(length)] => self.write_buffer(buf, length),
            [WriteArg::Text(text), WriteArg::Length(length)] => {
                self.write_buffer(text.as_bytes(), length)
            }
            [_] | [_, _] => Err(Error::InvalidArgument),
            _ => Err(Error::ArgumentCountMismatch),
        }
    }

    /// Writes `value`, integers rendered in `base` (decimal when `None`)
    pub fn print<'a>(
        &mut self,
        value: impl Into<Value<'a>>,
        base: Option<Base>,
    ) -> Result<usize, Error<T::Error>> {
        match (value.into(), base) {
            (Value::Integer(v), base) => {
                let text = format::format_integer(v, base.unwrap_or_default())
                    .map_err(|_| Error::InvalidArgument)?;
                self.write_all(text.as_bytes())
            }
            (Value::Text(text), None) => self.write_text(text),
            (Value::Text(_), Some(_)) => Err(Error::InvalidArgument),
        }
    }

    pub fn println<'a>(
        &mut self,
        value: impl Into<Value<'a>>,
        base: Option<Base>,
    ) -> Result<usize, Error<T::Error>> {
        let written = self.print(value, base)?;
        Ok(written + self.write_all(&[LINE_TERMINATOR])?)
    }

    fn write_text(&mut self, text: &str) -> Result<usize, Error<T::Error>> {
        let encoding = self.encoding;
        if encoding == Encoding::Utf8 {
            return self.write_all(text.as_bytes());
        }
        if !encoding.can_encode(text) {
            return Err(Error::InvalidArgument);
        }

        let mut written = 0;
        let mut chunk = Vec::<u8, ENCODE_CHUNK_LENGTH>::new();
        for c in text.chars() {
            if chunk.len() == ENCODE_CHUNK_LENGTH {
                written += self.write_all(&chunk)?;
                chunk.clear();
            }
            let b = encoding.single_byte(c).ok_or(Error::InvalidArgument)?;
            chunk.push(b).map_err(|_| Error::InvalidArgument)?;
        }
        written += self.write_all(&chunk)?;
        Ok(written)
    }

    /// Keeps writing until the transport accepted every byte. A transport that stops taking
    /// bytes fails the write with [`Error::InsufficientData`].
    fn write_all(&mut self, mut bytes: &[u8]) -> Result<usize, Error<T::Error>> {
        let transport = self.ready_transport()?;
        let mut written = 0;
        while !bytes.is_empty() {
            let n = transport.write_bytes(bytes).map_err(Error::Transport)?;
            if n == 0 {
                log::debug!("transport stalled after {} bytes, {} left", written, bytes.len());
                return Err(Error::InsufficientData);
            }
            written += n;
            bytes = &bytes[n..];
        }
        log::trace!("wrote {} bytes", written);
        Ok(written)
    }
}
