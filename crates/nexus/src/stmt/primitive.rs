use crate::Result;

use nexus_core::{
    err,
    stmt::{Type, Value},
    Error,
};

/// A Rust type that can be stored in a single column.
pub trait Primitive: Sized {
    const TYPE: Type;

    /// `true` for `Option<T>`
    const NULLABLE: bool = false;

    fn load(value: Value) -> Result<Self>;

    /// The column value for `self`. Fails when the value has no lossless
    /// representation as a column value.
    fn to_value(&self) -> Result<Value>;
}

macro_rules! impl_primitive_int {
    ( $( $ty:ty ),* ) => {
        $(
            impl Primitive for $ty {
                const TYPE: Type = Type::I64;

                fn load(value: Value) -> Result<Self> {
                    let value = value.to_i64()?;
                    <$ty>::try_from(value)
                        .map_err(|_| Error::type_conversion(Value::I64(value), stringify!($ty)))
                }

                fn to_value(&self) -> Result<Value> {
                    Ok(Value::I64(i64::from(*self)))
                }
            }
        )*
    };
}

impl_primitive_int!(i8, i16, i32, i64, u8, u16, u32);

// Integer columns are signed 64-bit, so the upper half of these types is
// refused on write.
macro_rules! impl_primitive_wide_unsigned {
    ( $( $ty:ty ),* ) => {
        $(
            impl Primitive for $ty {
                const TYPE: Type = Type::I64;

                fn load(value: Value) -> Result<Self> {
                    let value = value.to_i64()?;
                    <$ty>::try_from(value)
                        .map_err(|_| Error::type_conversion(Value::I64(value), stringify!($ty)))
                }

                fn to_value(&self) -> Result<Value> {
                    i64::try_from(*self).map(Value::I64).map_err(|_| {
                        err!("{} value {} does not fit an integer column", stringify!($ty), self)
                    })
                }
            }
        )*
    };
}

impl_primitive_wide_unsigned!(u64, usize);

impl Primitive for bool {
    const TYPE: Type = Type::Bool;

    fn load(value: Value) -> Result<Self> {
        value.to_bool()
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Bool(*self))
    }
}

impl Primitive for f32 {
    const TYPE: Type = Type::F64;

    fn load(value: Value) -> Result<Self> {
        value.to_f64().map(|value| value as f32)
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::F64(f64::from(*self)))
    }
}

impl Primitive for f64 {
    const TYPE: Type = Type::F64;

    fn load(value: Value) -> Result<Self> {
        value.to_f64()
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::F64(*self))
    }
}

impl Primitive for String {
    const TYPE: Type = Type::String;

    fn load(value: Value) -> Result<Self> {
        value.into_string()
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::String(self.clone()))
    }
}

impl Primitive for Vec<u8> {
    const TYPE: Type = Type::Bytes;

    fn load(value: Value) -> Result<Self> {
        value.to_bytes()
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Bytes(self.clone()))
    }
}

impl<T: Primitive> Primitive for Option<T> {
    const TYPE: Type = T::TYPE;
    const NULLABLE: bool = true;

    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => T::load(value).map(Some),
        }
    }

    fn to_value(&self) -> Result<Value> {
        match self {
            Some(value) => value.to_value(),
            None => Ok(Value::Null),
        }
    }
}
