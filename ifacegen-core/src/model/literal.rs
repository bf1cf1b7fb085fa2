//! Constant values: parameter defaults and attribute arguments.

use serde::{Deserialize, Serialize};

/// A constant value carried by metadata.
///
/// JSON form is adjacently tagged: `{"type": "int32", "value": 5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Char(char),
    String(String),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Single(f32),
    Double(f64),
    /// Any value kind without a textual form (decimal, enum, typeof, ...).
    Other { type_name: String, raw: String },
}

impl LiteralValue {
    /// Name of the value kind, for diagnostics.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::SByte(_) => "sbyte",
            Self::Byte(_) => "byte",
            Self::Int16(_) => "short",
            Self::UInt16(_) => "ushort",
            Self::Int32(_) => "int",
            Self::UInt32(_) => "uint",
            Self::Int64(_) => "long",
            Self::UInt64(_) => "ulong",
            Self::Single(_) => "float",
            Self::Double(_) => "double",
            Self::Other { type_name, .. } => type_name,
        }
    }
}
