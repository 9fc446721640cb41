//! Conversion of stored flag text to typed values.
//!
//! Integers are parsed to a 64-bit canonical value first (`u64` or `i64`)
//! and then narrowed with a checked conversion, so every width reports
//! out-of-range input the same way. Accepted forms, after trimming
//! surrounding whitespace:
//!
//! - decimal with an optional `+`/`-` sign: `42`, `-7`, `+3`
//! - hexadecimal with a `0x`/`0X` prefix after the optional sign: `0xff`
//!
//! A negative number requested as an unsigned type is a range error; it
//! never wraps. `-0` is zero.

use std::num::IntErrorKind;

use crate::error::{AccessError, AccessResult};

/// Types a stored flag value can be converted to.
pub trait FromFlagValue: Sized {
    /// Type name used in error messages.
    const TARGET: &'static str;

    fn from_flag_value(flag: &str, raw: &str) -> AccessResult<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumError {
    Range,
    Invalid,
}

impl NumError {
    fn into_access(self, flag: &str, raw: &str, target: &'static str) -> AccessError {
        match self {
            Self::Range => range(flag, raw, target),
            Self::Invalid => AccessError::Conversion {
                flag: flag.to_string(),
                value: raw.to_string(),
                target,
            },
        }
    }
}

fn range(flag: &str, raw: &str, target: &'static str) -> AccessError {
    AccessError::Range {
        flag: flag.to_string(),
        value: raw.to_string(),
        target,
    }
}

/// Split off sign and radix prefix: `-0x1f` => (true, "1f", 16).
fn split_number(text: &str) -> (bool, &str, u32) {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(hex) => (negative, hex, 16),
        None => (negative, rest, 10),
    }
}

fn parse_magnitude(digits: &str, radix: u32) -> Result<u64, NumError> {
    // `from_str_radix` would accept a second sign.
    if digits.starts_with(['+', '-']) {
        return Err(NumError::Invalid);
    }
    u64::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => NumError::Range,
        _ => NumError::Invalid,
    })
}

fn parse_unsigned(raw: &str) -> Result<u64, NumError> {
    let (negative, digits, radix) = split_number(raw.trim());
    let magnitude = parse_magnitude(digits, radix)?;
    if negative && magnitude != 0 {
        return Err(NumError::Range);
    }
    Ok(magnitude)
}

fn parse_signed(raw: &str) -> Result<i64, NumError> {
    let (negative, digits, radix) = split_number(raw.trim());
    let magnitude = parse_magnitude(digits, radix)?;
    if negative {
        0i64.checked_sub_unsigned(magnitude).ok_or(NumError::Range)
    } else {
        i64::try_from(magnitude).map_err(|_| NumError::Range)
    }
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {$(
        impl FromFlagValue for $t {
            const TARGET: &'static str = stringify!($t);

            fn from_flag_value(flag: &str, raw: &str) -> AccessResult<Self> {
                let wide = parse_unsigned(raw).map_err(|e| e.into_access(flag, raw, Self::TARGET))?;
                <$t>::try_from(wide).map_err(|_| range(flag, raw, Self::TARGET))
            }
        }
    )*};
}

macro_rules! impl_signed {
    ($($t:ty),*) => {$(
        impl FromFlagValue for $t {
            const TARGET: &'static str = stringify!($t);

            fn from_flag_value(flag: &str, raw: &str) -> AccessResult<Self> {
                let wide = parse_signed(raw).map_err(|e| e.into_access(flag, raw, Self::TARGET))?;
                <$t>::try_from(wide).map_err(|_| range(flag, raw, Self::TARGET))
            }
        }
    )*};
}

macro_rules! impl_float {
    ($($t:ty),*) => {$(
        impl FromFlagValue for $t {
            const TARGET: &'static str = stringify!($t);

            fn from_flag_value(flag: &str, raw: &str) -> AccessResult<Self> {
                let text = raw.trim();
                let value: $t = text
                    .parse()
                    .map_err(|_| NumError::Invalid.into_access(flag, raw, Self::TARGET))?;
                // Finite text that rounds to infinity overflowed the type.
                if value.is_infinite() && !text.to_ascii_lowercase().contains("inf") {
                    return Err(range(flag, raw, Self::TARGET));
                }
                Ok(value)
            }
        }
    )*};
}

impl_unsigned!(u8, u16, u32, u64);
impl_signed!(i8, i16, i32, i64);
impl_float!(f32, f64);

impl FromFlagValue for String {
    const TARGET: &'static str = "string";

    fn from_flag_value(_flag: &str, raw: &str) -> AccessResult<Self> {
        Ok(raw.to_string())
    }
}
