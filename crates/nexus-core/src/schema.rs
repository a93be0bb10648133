//! Descriptor tables built once per record type.
//!
//! A record type's fields are described by [`FieldDescriptor`]s, each parsed
//! from a column annotation of the form `<column-name> <column-type> [options]`.
//! The set of descriptors for one type is a [`Model`], indexed by both column
//! and field name.

mod annotation;
pub use annotation::{Annotation, Options};

mod field;
pub use field::FieldDescriptor;

mod model;
pub use model::Model;
