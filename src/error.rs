#[cfg(feature = "std")]
use core::fmt;

/// Errors surfaced by the device facade and the scanner
///
/// `E` is the error type of the underlying [`Transport`](crate::transport::Transport).
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum Error<E> {
    /// Caller supplied value has the wrong shape or range
    InvalidArgument,
    /// A required read or write length could not be satisfied
    InsufficientData,
    /// Variadic write called with an unsupported number of arguments
    ArgumentCountMismatch,
    /// Received bytes are not valid in the configured encoding
    Decode,
    /// Device was already ended
    Closed,
    Transport(E),
}

impl<E> Error<E> {
    pub(crate) fn from_transport(e: E) -> Self {
        Error::Transport(e)
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "invalid argument"),
            Error::InsufficientData => write!(f, "not enough bytes available"),
            Error::ArgumentCountMismatch => write!(f, "unsupported number of arguments"),
            Error::Decode => write!(f, "bytes are not valid in the configured encoding"),
            Error::Closed => write!(f, "device was ended"),
            Error::Transport(e) => write!(f, "transport error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug + fmt::Display> std::error::Error for Error<E> {}
