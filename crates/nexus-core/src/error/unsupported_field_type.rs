use super::Error;
use crate::stmt::Type;

/// Error when a column's raw storage value has no coercion into the field's
/// value type.
#[derive(Debug)]
pub(super) struct UnsupportedFieldType {
    column: Box<str>,
    from: Type,
    to: Type,
}

impl std::error::Error for UnsupportedFieldType {}

impl core::fmt::Display for UnsupportedFieldType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unsupported field type: column `{}` cannot receive {:?} as {:?}",
            self.column, self.from, self.to
        )
    }
}

impl Error {
    /// Creates an unsupported field type error.
    ///
    /// `from` is the type of the raw value produced by the driver and `to` is
    /// the value type of the receiving field.
    pub fn unsupported_field_type(column: impl Into<String>, from: Type, to: Type) -> Error {
        Error::from(super::ErrorKind::UnsupportedFieldType(UnsupportedFieldType {
            column: column.into().into(),
            from,
            to,
        }))
    }

    /// Returns `true` if this error is an unsupported field type error.
    pub fn is_unsupported_field_type(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnsupportedFieldType(_)))
    }
}
