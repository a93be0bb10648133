use crate::{engine, AsExecutor, Base, Mapper, Relations, Result, Schema, ValueConverter};

use nexus_core::{
    err,
    stmt::{Type, Value},
};

use indexmap::IndexMap;
use std::sync::Arc;

/// Static description of one persisted field, emitted by `#[derive(Record)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Struct field name
    pub name: &'static str,

    /// Raw `#[column("...")]` annotation
    pub annotation: &'static str,

    /// Value type of the field
    pub ty: Type,

    /// The field is an `Option<T>`
    pub optional: bool,
}

/// Index-based access to a record's persisted fields.
///
/// Implemented by `#[derive(Record)]`. Field indices follow declaration
/// order of the `#[column]` fields and match [`Record::fields`].
pub trait Record: Sized + Send + Sync + 'static {
    fn fields() -> Vec<FieldDef>;

    /// A new, fresh record with every field at its default value.
    fn blank() -> Self;

    fn get(&self, index: usize) -> Result<Value>;

    fn set(&mut self, index: usize, value: Value) -> Result<()>;

    fn base(&self) -> &Base;

    fn base_mut(&mut self) -> &mut Base;
}

/// A record type stored in its own table.
pub trait Model: Record {
    /// Unprefixed table name
    const TABLE: &'static str;

    /// Declares the type's relationships.
    fn declare(relations: &mut Relations) {
        let _ = relations;
    }

    /// Optional per-type value conversion applied while packing and
    /// extracting rows. Captured once, when the type's schema is built.
    fn converter() -> Option<Box<dyn ValueConverter>> {
        None
    }

    /// Runs before the record is inserted. Returning an error vetoes the
    /// whole create call.
    fn before_create(&mut self) -> Result<()> {
        Ok(())
    }

    fn before_update(&mut self) -> Result<()> {
        Ok(())
    }

    fn before_delete(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Column-level access and lazily resolved relationships.
pub trait ModelExt: Model {
    /// Returns the has-many relationship `name`, resolving it on first
    /// access.
    fn many<T: Model>(
        &mut self,
        exec: &impl AsExecutor,
        name: &str,
    ) -> Result<&IndexMap<Value, Arc<T>>>;

    /// Returns the has-one relationship `name`, resolving it on first access.
    fn one<T: Model>(&mut self, exec: &impl AsExecutor, name: &str) -> Result<Option<Arc<T>>>;

    /// Returns the value of the declared custom relationship `name`,
    /// resolving it on first access.
    fn custom_value(&mut self, exec: &impl AsExecutor, name: &str) -> Result<Value>;

    fn column_value(&self, column: &str) -> Result<Value>;

    fn set_column(&mut self, column: &str, value: impl Into<Value>) -> Result<()>;

    fn has_column(&self, column: &str) -> bool;

    /// Assigns every known, non-protected column of `values`. `NULL`s are
    /// skipped.
    fn fill<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: AsRef<str>,
        V: Into<Value>;

    /// Column values, without protected columns.
    fn to_map(&self) -> Result<IndexMap<String, Value>>;
}

impl<M: Model> ModelExt for M {
    fn many<T: Model>(
        &mut self,
        exec: &impl AsExecutor,
        name: &str,
    ) -> Result<&IndexMap<Value, Arc<T>>> {
        if !self.base().is_loaded(name) {
            load(self, exec, name)?;
        }

        self.base().many::<T>(name).ok_or_else(|| {
            err!(
                "relationship `{name}` on `{}` is not a has-many of `{}`",
                M::TABLE,
                T::TABLE
            )
        })
    }

    fn one<T: Model>(&mut self, exec: &impl AsExecutor, name: &str) -> Result<Option<Arc<T>>> {
        if !self.base().is_loaded(name) {
            load(self, exec, name)?;
        }

        self.base().one::<T>(name).ok_or_else(|| {
            err!(
                "relationship `{name}` on `{}` is not a has-one of `{}`",
                M::TABLE,
                T::TABLE
            )
        })
    }

    fn custom_value(&mut self, exec: &impl AsExecutor, name: &str) -> Result<Value> {
        if !self.base().is_loaded(name) {
            load(self, exec, name)?;
        }

        self.base().custom(name).cloned().ok_or_else(|| {
            err!(
                "relationship `{name}` on `{}` is not a custom relationship",
                M::TABLE
            )
        })
    }

    fn column_value(&self, column: &str) -> Result<Value> {
        mapper::<M>()?.col_value(self, column)
    }

    fn set_column(&mut self, column: &str, value: impl Into<Value>) -> Result<()> {
        mapper::<M>()?.set_value(self, column, value.into())
    }

    fn has_column(&self, column: &str) -> bool {
        Schema::of::<M>().is_ok_and(|schema| schema.mapper().model().contains(column))
    }

    fn fill<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let schema = Schema::of::<M>()?;
        schema.mapper().fill(
            self,
            values
                .into_iter()
                .map(|(column, value)| (column, value.into())),
        )
    }

    fn to_map(&self) -> Result<IndexMap<String, Value>> {
        mapper::<M>()?.to_map(self)
    }
}

fn mapper<M: Model>() -> Result<MapperRef> {
    Schema::of::<M>().map(MapperRef)
}

/// Keeps the schema alive while its mapper is borrowed.
struct MapperRef(Arc<Schema>);

impl std::ops::Deref for MapperRef {
    type Target = Mapper;

    fn deref(&self) -> &Mapper {
        self.0.mapper()
    }
}

fn load<M: Model>(record: &mut M, exec: &impl AsExecutor, name: &str) -> Result<()> {
    let exec = exec.executor();
    let schema = Schema::of::<M>()?;
    engine::resolve(&exec, &schema, &mut [record], &[name.to_string()], &[])
}
