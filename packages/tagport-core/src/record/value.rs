use serde::{Deserialize, Serialize};

use crate::schema::{FieldKind, ScalarKind};

use super::instance::RecordInstance;
use super::tag_ref::TagReference;

/// Value held by one field of a record instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Absent value; never translated
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    StringId(u32),
    /// Weak reference; `None` is a null reference
    TagRef(Option<TagReference>),
    /// Raw enumerated or flag value
    Enum(i64),
    Bytes(Vec<u8>),
    Struct(Box<RecordInstance>),
    Block(Vec<RecordInstance>),
    Array(Vec<Value>),
}

impl Value {
    /// Default value of a scalar kind.
    pub fn default_scalar(kind: ScalarKind) -> Value {
        match kind {
            ScalarKind::Bool => Value::Bool(false),
            ScalarKind::I8 => Value::I8(0),
            ScalarKind::I16 => Value::I16(0),
            ScalarKind::I32 => Value::I32(0),
            ScalarKind::I64 => Value::I64(0),
            ScalarKind::U8 => Value::U8(0),
            ScalarKind::U16 => Value::U16(0),
            ScalarKind::U32 => Value::U32(0),
            ScalarKind::U64 => Value::U64(0),
            ScalarKind::F32 => Value::F32(0.0),
            ScalarKind::F64 => Value::F64(0.0),
            ScalarKind::String => Value::String(String::new()),
            ScalarKind::StringId => Value::StringId(0),
            ScalarKind::TagReference => Value::TagRef(None),
        }
    }

    /// Returns true for values a translation never copies: `Null` and null
    /// tag references.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Null | Value::TagRef(None))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::String(_) => "string",
            Value::StringId(_) => "string_id",
            Value::TagRef(_) => "tag_reference",
            Value::Enum(_) => "enum",
            Value::Bytes(_) => "bytes",
            Value::Struct(_) => "struct",
            Value::Block(_) => "block",
            Value::Array(_) => "array",
        }
    }

    fn is_scalar(&self, kind: ScalarKind) -> bool {
        matches!(
            (self, kind),
            (Value::Bool(_), ScalarKind::Bool)
                | (Value::I8(_), ScalarKind::I8)
                | (Value::I16(_), ScalarKind::I16)
                | (Value::I32(_), ScalarKind::I32)
                | (Value::I64(_), ScalarKind::I64)
                | (Value::U8(_), ScalarKind::U8)
                | (Value::U16(_), ScalarKind::U16)
                | (Value::U32(_), ScalarKind::U32)
                | (Value::U64(_), ScalarKind::U64)
                | (Value::F32(_), ScalarKind::F32)
                | (Value::F64(_), ScalarKind::F64)
                | (Value::String(_), ScalarKind::String)
                | (Value::StringId(_), ScalarKind::StringId)
                | (Value::TagRef(_), ScalarKind::TagReference)
        )
    }

    /// Returns true if the value has the shape `kind` declares. `Null`
    /// conforms to every kind; nested record types are checked by name only.
    pub fn conforms_to(&self, kind: &FieldKind) -> bool {
        match (self, kind) {
            (Value::Null, _) => true,
            (value, FieldKind::Scalar(scalar)) => value.is_scalar(*scalar),
            (Value::Struct(record), FieldKind::Struct(type_name)) => {
                record.type_name() == type_name
            }
            (Value::Block(records), FieldKind::Block(type_name)) => {
                records.iter().all(|record| record.type_name() == type_name)
            }
            (Value::Array(values), FieldKind::Array(scalar)) => {
                values.iter().all(|value| value.is_scalar(*scalar))
            }
            (Value::Enum(_), FieldKind::Enum(_)) => true,
            (Value::Bytes(bytes), FieldKind::Bytes(length)) => bytes.len() == *length,
            _ => false,
        }
    }
}
