//! Type tags derived from IDL type names.

use std::fmt;

use crate::idl::IdlType;

/// Coercion class of a declared argument type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Bool,
    Integer(IntKind),
    Float(FloatKind),
    /// Addresses, strings, enums and composite shapes. Passed through as text.
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntKind {
    pub bits: u16,
    pub signed: bool,
}

impl IntKind {
    pub const fn new(bits: u16, signed: bool) -> Self {
        Self { bits, signed }
    }

    /// 64 bits and above are carried as arbitrary-precision integers.
    pub fn is_wide(&self) -> bool {
        self.bits >= 64
    }

    pub fn byte_len(&self) -> usize {
        usize::from(self.bits / 8)
    }

    pub fn name(&self) -> String {
        format!("{}{}", if self.signed { 'i' } else { 'u' }, self.bits)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatKind {
    F32,
    F64,
}

impl TypeTag {
    /// Classify a primitive type name. Unknown names are opaque.
    pub fn from_name(name: &str) -> Self {
        match name {
            "bool" => TypeTag::Bool,
            "u8" => TypeTag::Integer(IntKind::new(8, false)),
            "i8" => TypeTag::Integer(IntKind::new(8, true)),
            "u16" => TypeTag::Integer(IntKind::new(16, false)),
            "i16" => TypeTag::Integer(IntKind::new(16, true)),
            "u32" => TypeTag::Integer(IntKind::new(32, false)),
            "i32" => TypeTag::Integer(IntKind::new(32, true)),
            "u64" => TypeTag::Integer(IntKind::new(64, false)),
            "i64" => TypeTag::Integer(IntKind::new(64, true)),
            "u128" => TypeTag::Integer(IntKind::new(128, false)),
            "i128" => TypeTag::Integer(IntKind::new(128, true)),
            "u256" => TypeTag::Integer(IntKind::new(256, false)),
            "i256" => TypeTag::Integer(IntKind::new(256, true)),
            "f32" => TypeTag::Float(FloatKind::F32),
            "f64" => TypeTag::Float(FloatKind::F64),
            _ => TypeTag::Opaque,
        }
    }
}

impl IdlType {
    pub fn tag(&self) -> TypeTag {
        match self {
            IdlType::Primitive(p) => TypeTag::from_name(p),
            _ => TypeTag::Opaque,
        }
    }
}

/// Which half of a form a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Argument,
    Account,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Argument => write!(f, "argument"),
            FieldKind::Account => write!(f, "account"),
        }
    }
}
