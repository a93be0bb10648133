use super::Error;

/// Error when a relationship name was requested that the owning record type
/// never declared.
#[derive(Debug)]
pub(super) struct RelationNotDeclared {
    table: Box<str>,
    name: Box<str>,
}

impl std::error::Error for RelationNotDeclared {}

impl core::fmt::Display for RelationNotDeclared {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "relationship not declared: `{}` on `{}`",
            self.name, self.table
        )
    }
}

impl Error {
    /// Creates a relationship-not-declared error.
    pub fn relation_not_declared(table: impl Into<String>, name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::RelationNotDeclared(RelationNotDeclared {
            table: table.into().into(),
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is a relationship-not-declared error.
    pub fn is_relation_not_declared(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::RelationNotDeclared(_)))
    }
}
