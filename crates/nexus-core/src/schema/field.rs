use super::{Annotation, Options};
use crate::{driver::Receiver, stmt::Type, Error, Result};

/// Describes one field of a record type and the column it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Name of the struct field
    pub name: String,

    /// Name of the column
    pub column: String,

    /// Column type, as written in the annotation
    pub column_type: String,

    /// Value type of the field
    pub ty: Type,

    /// The field is declared as `Option<T>`
    pub optional: bool,

    pub options: Options,
}

impl FieldDescriptor {
    pub fn new(name: &str, annotation: &str, ty: Type, optional: bool) -> Result<FieldDescriptor> {
        let Annotation {
            column,
            column_type,
            options,
        } = Annotation::parse(annotation)
            .map_err(|err| err.context(Error::from_args(format_args!("field `{name}`"))))?;

        Ok(FieldDescriptor {
            name: name.to_string(),
            column,
            column_type,
            ty,
            optional,
            options,
        })
    }

    /// Whether a scanned `NULL` is acceptable for this field.
    pub fn nullable(&self) -> bool {
        self.options.nullable || self.optional
    }

    pub fn is_primary_key(&self) -> bool {
        self.options.primary_key
    }

    /// A receiver for scanning this field's column.
    pub fn receiver(&self) -> Receiver {
        Receiver::new(self.ty, self.nullable())
    }
}
