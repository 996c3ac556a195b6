//! Textual commands for driving a [`Device`] by hand
//!
//! A command is `name@arg|arg|...`, e.g. `println@255|HEX`, `read_until@\n` or `write@abc|3`.
//! Byte and character arguments accept the escapes `\n`, `\r`, `\t`, `\0`, `\\` and `0x..` hex.
use core::str::FromStr;
#[cfg(feature = "std")]
use core::fmt;
use heapless::{String, Vec};

use super::{Device, WriteArg};
use crate::error::Error;
use crate::format::{Base, Value};
use crate::scanner::Delimited;
use crate::transport::Transport;

const COMMAND_SEPARATOR: char = '@';
const ARGUMENT_SEPARATOR: char = '|';

/// Most arguments a command line may carry
pub const MAX_ARGUMENTS: usize = 4;
/// Capacity for data returned by reading commands
pub const RESPONSE_CAPACITY: usize = 256;

#[derive(PartialEq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum ParseCommandError {
    MissingSeparator,
    UnknownCommand,
    ArgumentCountMismatch { expected: usize, got: usize },
    InvalidArgument,
}

#[cfg(feature = "std")]
impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseCommandError::MissingSeparator => {
                write!(f, "missing '{}' after command name", COMMAND_SEPARATOR)
            }
            ParseCommandError::UnknownCommand => write!(f, "unknown command"),
            ParseCommandError::ArgumentCountMismatch { expected, got } => {
                write!(f, "expected {} arguments, got {}", expected, got)
            }
            ParseCommandError::InvalidArgument => write!(f, "invalid argument"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseCommandError {}

#[derive(PartialEq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum Command<'a> {
    Available,
    Read,
    ReadBytes(usize),
    ReadString,
    ReadUntil(char),
    ReadBytesUntil { delimiter: u8, length: usize },
    Find { target: u8, cap: usize },
    FindUntil { target: u8, terminal: u8 },
    Print { value: Value<'a>, base: Option<Base> },
    Println { value: Value<'a>, base: Option<Base> },
    Write(Vec<WriteArg<'a>, MAX_ARGUMENTS>),
    End,
}

/// What running a [`Command`] produced
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(PartialEq)]
pub enum Response {
    Count(usize),
    Byte(u8),
    Bytes(Vec<u8, RESPONSE_CAPACITY>),
    Line(Delimited<String<RESPONSE_CAPACITY>>),
    Scanned(Delimited<Vec<u8, RESPONSE_CAPACITY>>),
    Found(bool),
    Ended,
}

#[cfg(feature = "std")]
impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Response::Count(n) => write!(f, "{}", n),
            Response::Byte(b) => write!(f, "{:#04x}", b),
            Response::Bytes(bytes) => write!(f, "{:02x?}", bytes),
            Response::Line(line) => write!(f, "{:?} ({:?})", line.data.as_str(), line.outcome),
            Response::Scanned(scan) => write!(f, "{:02x?} ({:?})", scan.data, scan.outcome),
            Response::Found(found) => write!(f, "{}", found),
            Response::Ended => write!(f, "ended"),
        }
    }
}

fn expect_args(args: &[&str], min: usize, max: usize) -> Result<(), ParseCommandError> {
    if args.len() < min || args.len() > max {
        return Err(ParseCommandError::ArgumentCountMismatch {
            expected: if args.len() < min { min } else { max },
            got: args.len(),
        });
    }
    Ok(())
}

fn parse_byte(s: &str) -> Result<u8, ParseCommandError> {
    match s {
        "\\n" => return Ok(b'\n'),
        "\\r" => return Ok(b'\r'),
        "\\t" => return Ok(b'\t'),
        "\\0" => return Ok(0),
        "\\\\" => return Ok(b'\\'),
        _ => {}
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u8::from_str_radix(hex, 16).map_err(|_| ParseCommandError::InvalidArgument);
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(ParseCommandError::InvalidArgument),
    }
}

fn parse_number(s: &str) -> Result<usize, ParseCommandError> {
    usize::from_str(s).map_err(|_| ParseCommandError::InvalidArgument)
}

fn parse_print<'a>(args: &[&'a str]) -> Result<(Value<'a>, Option<Base>), ParseCommandError> {
    expect_args(args, 1, 2)?;
    let value = match i64::from_str(args[0]) {
        Ok(v) => Value::Integer(v),
        Err(_) => Value::Text(args[0]),
    };
    let base = match args.get(1) {
        Some(selector) => Some(
            selector
                .parse::<Base>()
                .map_err(|_| ParseCommandError::InvalidArgument)?,
        ),
        None => None,
    };
    Ok((value, base))
}

fn parse_write_arg(s: &str) -> WriteArg<'_> {
    if s.starts_with("0x") || s.starts_with("0X") {
        if let Ok(b) = parse_byte(s) {
            return WriteArg::Byte(b);
        }
    }
    WriteArg::Text(s)
}

impl<'a> Command<'a> {
    /// Parses `s` borrowing text arguments from it
    pub fn parse(s: &'a str) -> Result<Self, ParseCommandError> {
        let (name, rest) = s
            .split_once(COMMAND_SEPARATOR)
            .ok_or(ParseCommandError::MissingSeparator)?;

        let mut args = Vec::<&str, MAX_ARGUMENTS>::new();
        if !rest.is_empty() {
            for arg in rest.split(ARGUMENT_SEPARATOR) {
                args.push(arg)
                    .map_err(|_| ParseCommandError::ArgumentCountMismatch {
                        expected: MAX_ARGUMENTS,
                        got: rest.split(ARGUMENT_SEPARATOR).count(),
                    })?;
            }
        }

        match name {
            "available" => expect_args(&args, 0, 0).map(|_| Command::Available),
            "read" => expect_args(&args, 0, 0).map(|_| Command::Read),
            "read_bytes" => {
                expect_args(&args, 1, 1)?;
                Ok(Command::ReadBytes(parse_number(args[0])?))
            }
            "read_string" => expect_args(&args, 0, 0).map(|_| Command::ReadString),
            "read_until" => {
                expect_args(&args, 1, 1)?;
                Ok(Command::ReadUntil(parse_byte(args[0])? as char))
            }
            "read_bytes_until" => {
                expect_args(&args, 1, 2)?;
                Ok(Command::ReadBytesUntil {
                    delimiter: parse_byte(args[0])?,
                    length: args.get(1).map_or(Ok(0), |n| parse_number(n))?,
                })
            }
            "find" => {
                expect_args(&args, 1, 2)?;
                Ok(Command::Find {
                    target: parse_byte(args[0])?,
                    cap: args.get(1).map_or(Ok(0), |n| parse_number(n))?,
                })
            }
            "find_until" => {
                expect_args(&args, 2, 2)?;
                Ok(Command::FindUntil {
                    target: parse_byte(args[0])?,
                    terminal: parse_byte(args[1])?,
                })
            }
            "print" => {
                let (value, base) = parse_print(&args)?;
                Ok(Command::Print { value, base })
            }
            "println" => {
                let (value, base) = parse_print(&args)?;
                Ok(Command::Println { value, base })
            }
            // arity is checked by the device
            "write" => {
                let mut write_args = Vec::new();
                for (i, &arg) in args.iter().enumerate() {
                    let parsed = if i == 0 {
                        parse_write_arg(arg)
                    } else {
                        WriteArg::Length(parse_number(arg)?)
                    };
                    write_args
                        .push(parsed)
                        .map_err(|_| ParseCommandError::InvalidArgument)?;
                }
                Ok(Command::Write(write_args))
            }
            "end" => expect_args(&args, 0, 0).map(|_| Command::End),
            _ => Err(ParseCommandError::UnknownCommand),
        }
    }

    pub fn execute<T: Transport>(
        &self,
        device: &mut Device<T>,
    ) -> Result<Response, Error<T::Error>> {
        let response = match self {
            Command::Available => Response::Count(device.available()?),
            Command::Read => Response::Byte(device.read()?),
            Command::ReadBytes(length) => {
                let mut buf = Vec::<u8, RESPONSE_CAPACITY>::new();
                buf.resize_default(RESPONSE_CAPACITY)
                    .map_err(|_| Error::InvalidArgument)?;
                let n = device.read_bytes(&mut buf, *length)?;
                buf.truncate(n);
                Response::Bytes(buf)
            }
            Command::ReadString => Response::Line(device.read_string()?),
            Command::ReadUntil(delimiter) => Response::Line(device.read_string_until(*delimiter)?),
            Command::ReadBytesUntil { delimiter, length } => {
                let mut buf = Vec::<u8, RESPONSE_CAPACITY>::new();
                buf.resize_default(RESPONSE_CAPACITY)
                    .map_err(|_| Error::InvalidArgument)?;
                let outcome = device.read_bytes_until(*delimiter, &mut buf, *length)?;
                buf.truncate(outcome.consumed().unwrap_or(0));
                Response::Scanned(Delimited { data: buf, outcome })
            }
            Command::Find { target, cap } => Response::Found(device.find(*target, *cap)?),
            Command::FindUntil { target, terminal } => {
                Response::Found(device.find_until(*target, *terminal)?)
            }
            Command::Print { value, base } => Response::Count(device.print(*value, *base)?),
            Command::Println { value, base } => Response::Count(device.println(*value, *base)?),
            Command::Write(args) => Response::Count(device.write_args(args)?),
            Command::End => {
                device.end()?;
                Response::Ended
            }
        };
        Ok(response)
    }
}

impl<'a> TryFrom<&'a str> for Command<'a> {
    type Error = ParseCommandError;

    fn try_from(s: &'a str) -> Result<Self, Self::Error> {
        Command::parse(s)
    }
}
