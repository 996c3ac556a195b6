use defmt::Formatter;

use crate::device::command::ParseCommandError;
use crate::error::Error;
use crate::format::{Base, Encoding};
use crate::loopback::LoopbackError;
use crate::scanner::{ScanResult, TruncateReason};

impl<E> defmt::Format for Error<E> {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            Error::InvalidArgument => defmt::write!(fmt, "Error::InvalidArgument"),
            Error::InsufficientData => defmt::write!(fmt, "Error::InsufficientData"),
            Error::ArgumentCountMismatch => defmt::write!(fmt, "Error::ArgumentCountMismatch"),
            Error::Decode => defmt::write!(fmt, "Error::Decode"),
            Error::Closed => defmt::write!(fmt, "Error::Closed"),
            Error::Transport(_) => defmt::write!(fmt, "Error::Transport"),
        }
    }
}

impl defmt::Format for ScanResult {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            ScanResult::Found(offset) => defmt::write!(fmt, "ScanResult::Found({=usize})", offset),
            ScanResult::NotFound => defmt::write!(fmt, "ScanResult::NotFound"),
            ScanResult::Truncated { consumed, reason } => defmt::write!(
                fmt,
                "ScanResult::Truncated({=usize}, {})",
                consumed,
                reason
            ),
        }
    }
}

impl defmt::Format for TruncateReason {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            TruncateReason::CapReached => defmt::write!(fmt, "CapReached"),
            TruncateReason::Exhausted => defmt::write!(fmt, "Exhausted"),
        }
    }
}

impl defmt::Format for Base {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            Base::Dec => defmt::write!(fmt, "DEC"),
            Base::Hex => defmt::write!(fmt, "HEX"),
            Base::Oct => defmt::write!(fmt, "OCT"),
            Base::Bin => defmt::write!(fmt, "BIN"),
        }
    }
}

impl defmt::Format for Encoding {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            Encoding::Utf8 => defmt::write!(fmt, "utf-8"),
            Encoding::Ascii => defmt::write!(fmt, "ascii"),
            Encoding::Latin1 => defmt::write!(fmt, "latin-1"),
        }
    }
}

impl defmt::Format for LoopbackError {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            LoopbackError::InputFull => defmt::write!(fmt, "LoopbackError::InputFull"),
            LoopbackError::OutputFull => defmt::write!(fmt, "LoopbackError::OutputFull"),
        }
    }
}

impl defmt::Format for ParseCommandError {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            ParseCommandError::MissingSeparator => defmt::write!(fmt, "MissingSeparator"),
            ParseCommandError::UnknownCommand => defmt::write!(fmt, "UnknownCommand"),
            ParseCommandError::ArgumentCountMismatch { expected, got } => defmt::write!(
                fmt,
                "ArgumentCountMismatch({=usize}, {=usize})",
                expected,
                got
            ),
            ParseCommandError::InvalidArgument => defmt::write!(fmt, "InvalidArgument"),
        }
    }
}
