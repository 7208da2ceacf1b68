//! IDL type-aware coercion of raw form strings.
//!
//! Numeric parsing is strict: surrounding whitespace, signs on unsigned
//! types, digit separators and trailing characters all fail with
//! `InvalidNumericLiteral`.

use std::fmt;

use idl_console_core::error::ConsoleError;
use idl_console_core::types::{FloatKind, IntKind, TypeTag};
use num_bigint::BigInt;

/// A raw value converted according to its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    F32(f32),
    F64(f64),
    /// 64-bit and wider integers, kept exact.
    Int { kind: IntKind, value: BigInt },
    /// Opaque types pass through untouched.
    Text(String),
}

impl fmt::Display for CoercedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercedValue::Bool(v) => write!(f, "{}", v),
            CoercedValue::U8(v) => write!(f, "{}", v),
            CoercedValue::I8(v) => write!(f, "{}", v),
            CoercedValue::U16(v) => write!(f, "{}", v),
            CoercedValue::I16(v) => write!(f, "{}", v),
            CoercedValue::U32(v) => write!(f, "{}", v),
            CoercedValue::I32(v) => write!(f, "{}", v),
            CoercedValue::F32(v) => write!(f, "{}", v),
            CoercedValue::F64(v) => write!(f, "{}", v),
            CoercedValue::Int { kind, value } => write!(f, "{}{}", value, kind.name()),
            CoercedValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Coerce `raw` to the class named by `tag`. Pure.
pub fn coerce(raw: &str, tag: TypeTag) -> Result<CoercedValue, ConsoleError> {
    match tag {
        TypeTag::Bool => Ok(CoercedValue::Bool(raw == "true" || raw == "1")),
        TypeTag::Integer(kind) if kind.is_wide() => parse_wide(raw, kind),
        TypeTag::Integer(kind) => parse_narrow(raw, kind),
        TypeTag::Float(kind) => parse_float(raw, kind),
        TypeTag::Opaque => Ok(CoercedValue::Text(raw.to_string())),
    }
}

fn is_decimal_literal(raw: &str, signed: bool) -> bool {
    let digits = match raw.strip_prefix('-') {
        Some(rest) if signed => rest,
        Some(_) => return false,
        None => raw,
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_narrow(raw: &str, kind: IntKind) -> Result<CoercedValue, ConsoleError> {
    let invalid = || ConsoleError::invalid_numeric(kind.name(), raw);
    if !is_decimal_literal(raw, kind.signed) {
        return Err(invalid());
    }
    let value = match (kind.bits, kind.signed) {
        (8, false) => raw.parse().map(CoercedValue::U8).ok(),
        (8, true) => raw.parse().map(CoercedValue::I8).ok(),
        (16, false) => raw.parse().map(CoercedValue::U16).ok(),
        (16, true) => raw.parse().map(CoercedValue::I16).ok(),
        (32, false) => raw.parse().map(CoercedValue::U32).ok(),
        (32, true) => raw.parse().map(CoercedValue::I32).ok(),
        _ => None,
    };
    value.ok_or_else(invalid)
}

fn parse_wide(raw: &str, kind: IntKind) -> Result<CoercedValue, ConsoleError> {
    let invalid = || ConsoleError::invalid_numeric(kind.name(), raw);
    if !is_decimal_literal(raw, kind.signed) {
        return Err(invalid());
    }
    let value: BigInt = raw.parse().map_err(|_| invalid())?;
    if !fits(&value, kind) {
        return Err(invalid());
    }
    Ok(CoercedValue::Int { kind, value })
}

/// Range check against the declared width.
pub(crate) fn fits(value: &BigInt, kind: IntKind) -> bool {
    let one = BigInt::from(1u8);
    if kind.signed {
        let bound = &one << (kind.bits - 1);
        *value >= -bound.clone() && *value < bound
    } else {
        *value >= BigInt::from(0u8) && *value < (&one << kind.bits)
    }
}

fn parse_float(raw: &str, kind: FloatKind) -> Result<CoercedValue, ConsoleError> {
    let name = match kind {
        FloatKind::F32 => "f32",
        FloatKind::F64 => "f64",
    };
    // str::parse accepts "inf" and "NaN"; only digits, sign, point and exponent get through.
    if raw.chars().any(|c| c.is_alphabetic() && c != 'e' && c != 'E') {
        return Err(ConsoleError::invalid_numeric(name, raw));
    }
    let parsed = match kind {
        FloatKind::F32 => raw.parse::<f32>().ok().filter(|v| v.is_finite()).map(CoercedValue::F32),
        FloatKind::F64 => raw.parse::<f64>().ok().filter(|v| v.is_finite()).map(CoercedValue::F64),
    };
    parsed.ok_or_else(|| ConsoleError::invalid_numeric(name, raw))
}
