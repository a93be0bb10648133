use crate::{
    stmt::{Type, Value},
    Error, Result,
};

use chrono::{DateTime, NaiveDateTime, Utc};

/// A typed, empty slot for one scanned column.
///
/// Drivers hand raw storage values to [`Receiver::accept`], which coerces
/// them into the field's value type. A nullable receiver keeps `NULL` distinct
/// from the type's zero value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receiver {
    pub ty: Type,
    pub nullable: bool,
}

impl Receiver {
    pub fn new(ty: Type, nullable: bool) -> Receiver {
        Receiver { ty, nullable }
    }

    pub fn accept(&self, column: &str, raw: Value) -> Result<Value> {
        let unsupported = |raw: &Value| Error::unsupported_field_type(column, raw.ty(), self.ty);

        Ok(match (self.ty, raw) {
            (_, Value::Null) if self.nullable => Value::Null,
            (_, Value::Null) => {
                return Err(Error::row_scan(
                    column,
                    "NULL received for a non-nullable column",
                ))
            }

            (Type::Bool, raw @ Value::Bool(_)) => raw,
            (Type::Bool, Value::I64(v)) => Value::Bool(v != 0),
            (Type::Bool, raw @ Value::String(_)) => match raw.as_str() {
                Some("1" | "t" | "true" | "TRUE") => Value::Bool(true),
                Some("0" | "f" | "false" | "FALSE") => Value::Bool(false),
                _ => return Err(unsupported(&raw)),
            },

            (Type::I64, raw @ Value::I64(_)) => raw,
            (Type::I64, Value::Bool(v)) => Value::I64(v as i64),
            (Type::I64, Value::F64(v)) if v.fract() == 0.0 => Value::I64(v as i64),
            (Type::I64, raw @ Value::String(_)) => {
                match raw.as_str().and_then(|s| s.trim().parse::<i64>().ok()) {
                    Some(v) => Value::I64(v),
                    None => return Err(unsupported(&raw)),
                }
            }

            (Type::F64, raw @ Value::F64(_)) => raw,
            (Type::F64, Value::I64(v)) => Value::F64(v as f64),
            (Type::F64, raw @ Value::String(_)) => {
                match raw.as_str().and_then(|s| s.trim().parse::<f64>().ok()) {
                    Some(v) => Value::F64(v),
                    None => return Err(unsupported(&raw)),
                }
            }

            (Type::String, raw @ Value::String(_)) => raw,
            (Type::String, Value::I64(v)) => Value::String(v.to_string()),
            (Type::String, Value::F64(v)) => Value::String(v.to_string()),
            (Type::String, Value::Timestamp(v)) => Value::String(v.to_rfc3339()),
            (Type::String, Value::Bytes(v)) => match String::from_utf8(v) {
                Ok(v) => Value::String(v),
                Err(err) => return Err(unsupported(&Value::Bytes(err.into_bytes()))),
            },

            (Type::Bytes, raw @ Value::Bytes(_)) => raw,
            (Type::Bytes, Value::String(v)) => Value::Bytes(v.into_bytes()),

            (Type::Timestamp, raw @ Value::Timestamp(_)) => raw,
            (Type::Timestamp, raw @ Value::String(_)) => {
                match raw.as_str().and_then(parse_timestamp) {
                    Some(v) => Value::Timestamp(v),
                    None => return Err(unsupported(&raw)),
                }
            }
            (Type::Timestamp, raw @ Value::I64(v)) => match DateTime::from_timestamp(v, 0) {
                Some(v) => Value::Timestamp(v),
                None => return Err(unsupported(&raw)),
            },

            (_, raw) => return Err(unsupported(&raw)),
        })
    }
}

fn parse_timestamp(src: &str) -> Option<DateTime<Utc>> {
    if let Ok(v) = DateTime::parse_from_rfc3339(src) {
        return Some(v.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(src, fmt).ok())
        .map(|v| v.and_utc())
}
