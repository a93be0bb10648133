use super::Primitive;
use crate::Result;

use nexus_core::stmt::{Type, Value};

use chrono::{DateTime, Utc};

impl Primitive for DateTime<Utc> {
    const TYPE: Type = Type::Timestamp;

    fn load(value: Value) -> Result<Self> {
        value.to_timestamp()
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Timestamp(*self))
    }
}
