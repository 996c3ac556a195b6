//! Arduino-style `Serial` API over a generic serial port connection.
//!
//! [`Device`] exposes `read`, `readBytes`, `readStringUntil`, `find`, `print`, `println`,
//! `write` and friends on top of any [`Transport`]. The search oriented calls share a single
//! delimiter scanning loop, see [`scanner`].

#![cfg_attr(not(feature = "std"), no_std)]

pub mod device;
pub mod error;
pub mod format;
pub mod loopback;
pub mod scanner;
pub mod transport;

#[cfg(feature = "serialport")]
pub mod serial;

// include defmt::Format implementations
// we don't want them derive()d in the modules unless defmt-impl feature is set
#[cfg(feature = "defmt-impl")]
pub mod defmt;

// reexport heapless
pub use heapless;

pub use device::{Device, WriteArg, WriteValue};
pub use error::Error;
pub use format::{Base, Encoding, Value};
pub use scanner::{Delimited, Recorded, Scan, ScanResult, TruncateReason};
pub use transport::{ByteSource, Pushback, Transport};
