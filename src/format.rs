//! Value formatting for `print`/`println` and text encodings
use core::fmt::Write;
use core::str::FromStr;
use heapless::String;

/// `-` + `0b` prefix + 64 binary digits
pub const MAX_NUMBER_LENGTH: usize = 67;

pub type NumberString = String<MAX_NUMBER_LENGTH>;

/// Numeric base selector accepted by `print`
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum Base {
    Dec,
    Hex,
    Oct,
    Bin,
}

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct UnknownBase;

impl FromStr for Base {
    type Err = UnknownBase;

    fn from_str(s: &str) -> Result<Self, UnknownBase> {
        if s.eq_ignore_ascii_case("DEC") {
            Ok(Base::Dec)
        } else if s.eq_ignore_ascii_case("HEX") {
            Ok(Base::Hex)
        } else if s.eq_ignore_ascii_case("OCT") {
            Ok(Base::Oct)
        } else if s.eq_ignore_ascii_case("BIN") {
            Ok(Base::Bin)
        } else {
            Err(UnknownBase)
        }
    }
}

impl Default for Base {
    fn default() -> Self {
        Base::Dec
    }
}

/// Renders `value` in `base`, e.g. `255` as `0xff` in hex. Negative numbers get a leading `-`
/// in front of the prefix.
pub fn format_integer(value: i64, base: Base) -> Result<NumberString, core::fmt::Error> {
    let mut out = NumberString::new();
    let magnitude = value.unsigned_abs();
    if value < 0 {
        out.push('-').map_err(|_| core::fmt::Error)?;
    }
    match base {
        Base::Dec => write!(out, "{}", magnitude),
        Base::Hex => write!(out, "{:#x}", magnitude),
        Base::Oct => write!(out, "{:#o}", magnitude),
        Base::Bin => write!(out, "{:#b}", magnitude),
    }?;
    Ok(out)
}

/// Anything `print` knows how to render
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum Value<'a> {
    Integer(i64),
    Text(&'a str),
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value<'_> {
                fn from(v: $t) -> Self {
                    Value::Integer(i64::from(v))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(s)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum Encoding {
    Utf8,
    Ascii,
    Latin1,
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::Utf8
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct UnknownEncoding;

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, UnknownEncoding> {
        match s {
            "utf-8" | "utf8" | "UTF-8" | "UTF8" => Ok(Encoding::Utf8),
            "ascii" | "ASCII" | "us-ascii" => Ok(Encoding::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" | "ISO-8859-1" => Ok(Encoding::Latin1),
            _ => Err(UnknownEncoding),
        }
    }
}

impl Encoding {
    /// Byte `c` encodes to in single byte encodings, `None` for UTF-8 or unencodable chars
    pub fn single_byte(self, c: char) -> Option<u8> {
        let limit = match self {
            Encoding::Utf8 => return None,
            Encoding::Ascii => 0x7f,
            Encoding::Latin1 => 0xff,
        };
        match c as u32 {
            code if code <= limit => Some(code as u8),
            _ => None,
        }
    }

    pub fn can_encode(self, text: &str) -> bool {
        match self {
            Encoding::Utf8 => true,
            _ => text.chars().all(|c| self.single_byte(c).is_some()),
        }
    }

    /// Char a lone byte decodes to.
    ///
    /// UTF-8 only answers for ASCII bytes here; multi-byte sequences have to be decoded as a
    /// whole.
    pub fn decode_byte(self, b: u8) -> Option<char> {
        match self {
            Encoding::Latin1 => Some(char::from(b)),
            Encoding::Utf8 | Encoding::Ascii if b.is_ascii() => Some(char::from(b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_parse() {
        assert_eq!("HEX".parse::<Base>(), Ok(Base::Hex));
        assert_eq!("bin".parse::<Base>(), Ok(Base::Bin));
        assert_eq!("Dec".parse::<Base>(), Ok(Base::Dec));
        assert_eq!("OCT".parse::<Base>(), Ok(Base::Oct));
        assert_eq!("B16".parse::<Base>(), Err(UnknownBase));
    }

    #[test]
    fn test_format_hex() {
        assert_eq!(format_integer(255, Base::Hex).unwrap().as_str(), "0xff");
    }

    #[test]
    fn test_format_all_bases() {
        assert_eq!(format_integer(255, Base::Dec).unwrap().as_str(), "255");
        assert_eq!(format_integer(255, Base::Oct).unwrap().as_str(), "0o377");
        assert_eq!(format_integer(5, Base::Bin).unwrap().as_str(), "0b101");
        assert_eq!(format_integer(0, Base::Hex).unwrap().as_str(), "0x0");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_integer(-255, Base::Hex).unwrap().as_str(), "-0xff");
        assert_eq!(format_integer(-12, Base::Dec).unwrap().as_str(), "-12");
    }

    #[test]
    fn test_format_extremes_fit() {
        let min = format_integer(i64::MIN, Base::Bin).unwrap();
        assert_eq!(min.len(), MAX_NUMBER_LENGTH);
        assert!(min.starts_with("-0b1"));
        assert_eq!(
            format_integer(i64::MAX, Base::Dec).unwrap().as_str(),
            "9223372036854775807"
        );
    }

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from(7u8), Value::Integer(7));
        assert_eq!(Value::from(-3i32), Value::Integer(-3));
        assert_eq!(Value::from("hi"), Value::Text("hi"));
    }

    #[test]
    fn test_encoding_single_byte() {
        assert_eq!(Encoding::Ascii.single_byte('A'), Some(0x41));
        assert_eq!(Encoding::Ascii.single_byte('é'), None);
        assert_eq!(Encoding::Latin1.single_byte('é'), Some(0xe9));
        assert_eq!(Encoding::Latin1.single_byte('€'), None);
        assert!(Encoding::Utf8.can_encode("€"));
        assert!(!Encoding::Ascii.can_encode("caf\u{e9}"));
    }

    #[test]
    fn test_decode_byte() {
        assert_eq!(Encoding::Latin1.decode_byte(0xe9), Some('\u{e9}'));
        assert_eq!(Encoding::Latin1.decode_byte(b'c'), Some('c'));
        assert_eq!(Encoding::Ascii.decode_byte(b'c'), Some('c'));
        assert_eq!(Encoding::Ascii.decode_byte(0x80), None);
        assert_eq!(Encoding::Utf8.decode_byte(0xc3), None);
    }

    #[test]
    fn test_encoding_parse() {
        assert_eq!("utf-8".parse::<Encoding>(), Ok(Encoding::Utf8));
        assert_eq!("latin-1".parse::<Encoding>(), Ok(Encoding::Latin1));
        assert_eq!("ebcdic".parse::<Encoding>(), Err(UnknownEncoding));
    }
}
