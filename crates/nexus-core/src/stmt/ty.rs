use super::Value;

use chrono::{DateTime, Utc};

/// The value type of a record field, as seen by the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 64-bit integer. Narrower integer fields widen into it.
    I64,

    /// 64-bit float
    F64,

    /// UTF-8 string
    String,

    /// Binary blob
    Bytes,

    /// Instant in UTC
    Timestamp,

    /// The type of `NULL`
    Null,
}

impl Type {
    /// The type's zero value, assigned to non-optional fields whose nullable
    /// column came back as `NULL`.
    pub fn zero(self) -> Value {
        match self {
            Type::Bool => Value::Bool(false),
            Type::I64 => Value::I64(0),
            Type::F64 => Value::F64(0.0),
            Type::String => Value::String(String::new()),
            Type::Bytes => Value::Bytes(vec![]),
            Type::Timestamp => Value::Timestamp(DateTime::<Utc>::default()),
            Type::Null => Value::Null,
        }
    }

    pub fn is_timestamp(self) -> bool {
        matches!(self, Type::Timestamp)
    }
}
