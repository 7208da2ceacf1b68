//! Borsh encoding of instruction data for Anchor-style programs.
//!
//! Layout: 8-byte discriminator, then every argument in declared order.
//! Opaque values arrive as text and are encoded against their IDL type
//! here; composite shapes are entered as comma-separated lists.

use borsh::BorshSerialize;
use idl_console_core::error::ConsoleError;
use idl_console_core::idl::{IdlInstruction, IdlType, InterfaceDefinition};
use idl_console_core::types::{TypeTag, IntKind};
use num_bigint::{BigInt, Sign};

use crate::address::{hex_decode, parse_address};
use crate::assemble::BoundArgument;
use crate::coerce::{coerce, CoercedValue};

/// Encode the full instruction data for `ix`.
pub fn encode_instruction_data(
    idl: &InterfaceDefinition,
    ix: &IdlInstruction,
    args: &[BoundArgument],
) -> Result<Vec<u8>, ConsoleError> {
    let mut out = ix.discriminator().to_vec();
    for arg in args {
        encode_value(&mut out, idl, &arg.name, &arg.type_, &arg.value)?;
    }
    Ok(out)
}

/// Encode one coerced value against its declared type.
pub fn encode_value(
    out: &mut Vec<u8>,
    idl: &InterfaceDefinition,
    name: &str,
    ty: &IdlType,
    value: &CoercedValue,
) -> Result<(), ConsoleError> {
    match value {
        CoercedValue::Text(raw) => encode_raw(out, idl, name, ty, raw),
        CoercedValue::Bool(v) => put(out, name, v),
        CoercedValue::U8(v) => put(out, name, v),
        CoercedValue::I8(v) => put(out, name, v),
        CoercedValue::U16(v) => put(out, name, v),
        CoercedValue::I16(v) => put(out, name, v),
        CoercedValue::U32(v) => put(out, name, v),
        CoercedValue::I32(v) => put(out, name, v),
        CoercedValue::F32(v) => put(out, name, v),
        CoercedValue::F64(v) => put(out, name, v),
        CoercedValue::Int { kind, value } => {
            out.extend(fixed_width_le(value, *kind));
            Ok(())
        }
    }
}

fn put<T: BorshSerialize>(out: &mut Vec<u8>, name: &str, value: &T) -> Result<(), ConsoleError> {
    value.serialize(out).map_err(|e| ConsoleError::Encoding {
        name: name.to_string(),
        message: e.to_string(),
    })
}

/// Little-endian two's complement at the declared width. The value is
/// range-checked at coercion time.
pub fn fixed_width_le(value: &BigInt, kind: IntKind) -> Vec<u8> {
    let (fill, mut bytes) = match value.sign() {
        Sign::Minus => (0xff, value.to_signed_bytes_le()),
        _ => (0x00, value.to_bytes_le().1),
    };
    bytes.resize(kind.byte_len(), fill);
    bytes
}

fn unsupported(name: &str, ty: &IdlType) -> ConsoleError {
    ConsoleError::UnsupportedType {
        name: name.to_string(),
        type_name: crate::cli::idl_type_display(ty),
    }
}

fn encode_raw(
    out: &mut Vec<u8>,
    idl: &InterfaceDefinition,
    name: &str,
    ty: &IdlType,
    raw: &str,
) -> Result<(), ConsoleError> {
    match ty {
        IdlType::Primitive(_) if ty.is_address() => {
            let key = parse_address(raw).map_err(|_| ConsoleError::InvalidAddress {
                name: name.to_string(),
                value: raw.to_string(),
            })?;
            out.extend_from_slice(key.as_ref());
            Ok(())
        }
        IdlType::Primitive(p) if p == "string" || p == "String" => put(out, name, &raw.to_string()),
        IdlType::Primitive(p) if p == "bytes" => {
            let bytes = decode_hex_prefixed(raw).map_err(|message| ConsoleError::Encoding {
                name: name.to_string(),
                message,
            })?;
            put(out, name, &bytes)
        }
        IdlType::Primitive(p) => match TypeTag::from_name(p) {
            TypeTag::Opaque => Err(unsupported(name, ty)),
            tag => encode_value(out, idl, name, ty, &coerce(raw, tag)?),
        },
        IdlType::Option { option } => {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed == "null" || trimmed == "none" {
                out.push(0);
                Ok(())
            } else {
                out.push(1);
                encode_raw(out, idl, name, option, trimmed)
            }
        }
        IdlType::Vec { vec } => {
            let parts = split_list(raw);
            put(out, name, &(parts.len() as u32))?;
            for part in parts {
                encode_raw(out, idl, name, vec, part)?;
            }
            Ok(())
        }
        IdlType::Array { array } => encode_array(out, idl, name, &array.0, array.1, raw),
        IdlType::Defined { defined } => {
            let index = unit_variant_index(idl, defined.name(), raw.trim())
                .ok_or_else(|| unsupported(name, ty))?;
            out.push(index);
            Ok(())
        }
    }
}

fn encode_array(
    out: &mut Vec<u8>,
    idl: &InterfaceDefinition,
    name: &str,
    elem_type: &IdlType,
    size: usize,
    raw: &str,
) -> Result<(), ConsoleError> {
    let encoding = |message: String| ConsoleError::Encoding { name: name.to_string(), message };
    match elem_type {
        IdlType::Primitive(p) if p == "u8" => {
            let bytes = if raw.len() == size * 2 && raw.chars().all(|c| c.is_ascii_hexdigit()) {
                hex_decode(raw).map_err(encoding)?
            } else if raw.starts_with("0x") || raw.starts_with("0X") {
                hex_decode(&raw[2..]).map_err(encoding)?
            } else {
                let str_bytes = raw.as_bytes();
                if str_bytes.len() > size {
                    return Err(encoding(format!(
                        "'{}' is {} bytes, max {} for [u8; {}]",
                        raw,
                        str_bytes.len(),
                        size,
                        size
                    )));
                }
                let mut bytes = vec![0u8; size];
                bytes[..str_bytes.len()].copy_from_slice(str_bytes);
                bytes
            };
            if bytes.len() != size {
                return Err(encoding(format!("expected {} bytes, got {}", size, bytes.len())));
            }
            out.extend(bytes);
            Ok(())
        }
        _ => {
            let parts = split_list(raw);
            if parts.len() != size {
                return Err(encoding(format!("expected {} values, got {}", size, parts.len())));
            }
            for part in parts {
                encode_raw(out, idl, name, elem_type, part)?;
            }
            Ok(())
        }
    }
}

fn decode_hex_prefixed(raw: &str) -> Result<Vec<u8>, String> {
    let hex = raw
        .trim()
        .strip_prefix("0x")
        .or_else(|| raw.trim().strip_prefix("0X"))
        .unwrap_or(raw.trim());
    hex_decode(hex)
}

/// Comma-separated elements; blank input is the empty list.
fn split_list(raw: &str) -> Vec<&str> {
    if raw.trim().is_empty() {
        return vec![];
    }
    raw.split(',').map(|s| s.trim()).collect()
}

/// Borsh index of a fieldless enum variant named `variant`.
fn unit_variant_index(idl: &InterfaceDefinition, type_name: &str, variant: &str) -> Option<u8> {
    let def = idl.type_def(type_name)?;
    if def.type_.kind != "enum" {
        return None;
    }
    let position = def.type_.variants.iter().position(|v| v.name == variant)?;
    let has_fields = def.type_.variants[position]
        .fields
        .as_ref()
        .is_some_and(|f| !f.is_null() && f.as_array().map_or(true, |a| !a.is_empty()));
    if has_fields {
        return None;
    }
    u8::try_from(position).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_negative_sign_extends() {
        let bytes = fixed_width_le(&BigInt::from(-2), IntKind::new(64, true));
        assert_eq!(bytes, (-2i64).to_le_bytes());
        let bytes = fixed_width_le(&BigInt::from(i128::MIN), IntKind::new(128, true));
        assert_eq!(bytes, i128::MIN.to_le_bytes());
    }

    #[test]
    fn test_fixed_width_unsigned_max() {
        let bytes = fixed_width_le(&BigInt::from(u64::MAX), IntKind::new(64, false));
        assert_eq!(bytes, u64::MAX.to_le_bytes());
        let bytes = fixed_width_le(&BigInt::from(0), IntKind::new(256, false));
        assert_eq!(bytes, vec![0u8; 32]);
    }

    #[test]
    fn test_split_list() {
        assert!(split_list("  ").is_empty());
        assert_eq!(split_list("1, 2,3"), vec!["1", "2", "3"]);
    }
}
