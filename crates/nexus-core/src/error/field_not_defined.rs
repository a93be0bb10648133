use super::Error;

/// Error when a column or field name is not part of a record type's
/// descriptor set.
#[derive(Debug)]
pub(super) struct FieldNotDefined {
    table: Box<str>,
    name: Box<str>,
}

impl std::error::Error for FieldNotDefined {}

impl core::fmt::Display for FieldNotDefined {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "field not defined: `{}` on `{}`", self.name, self.table)
    }
}

impl Error {
    /// Creates a field-not-defined error for `name` on the record type backed
    /// by `table`.
    pub fn field_not_defined(table: impl Into<String>, name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::FieldNotDefined(FieldNotDefined {
            table: table.into().into(),
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is a field-not-defined error.
    pub fn is_field_not_defined(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::FieldNotDefined(_)))
    }
}
