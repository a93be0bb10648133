use crate::{FieldDef, Record, Result};

use nexus_core::{
    driver::Receiver,
    err,
    schema::{FieldDescriptor, Model},
    stmt::{Type, Value},
};

use indexmap::IndexMap;
use std::fmt;

/// Per-type value conversion, intercepting the default coercion of any
/// column while packing rows and extracting records.
pub trait ValueConverter: Send + Sync + 'static {
    /// Converts a field value into the value written to the column.
    fn to_db(&self, column: &str, value: Value) -> Result<Value> {
        let _ = column;
        Ok(value)
    }

    /// Converts a scanned column value into the value assigned to the field.
    fn from_db(&self, column: &str, value: Value) -> Result<Value> {
        let _ = column;
        Ok(value)
    }

    /// Overrides the type a column is scanned as.
    fn column_type(&self, column: &str) -> Option<Type> {
        let _ = column;
        None
    }
}

/// Converts between rows and records of one type.
pub struct Mapper {
    model: Model,
    converter: Option<Box<dyn ValueConverter>>,
}

impl Mapper {
    pub fn new(model: Model, converter: Option<Box<dyn ValueConverter>>) -> Mapper {
        Mapper { model, converter }
    }

    /// Builds the descriptor table from the fields a record type declares.
    pub fn from_fields(
        table: &str,
        fields: &[FieldDef],
        converter: Option<Box<dyn ValueConverter>>,
    ) -> Result<Mapper> {
        let fields = fields
            .iter()
            .map(|field| {
                FieldDescriptor::new(field.name, field.annotation, field.ty, field.optional)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Mapper::new(Model::new(table, fields)?, converter))
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// One receiver per requested column.
    pub fn receivers(&self, columns: &[String]) -> Result<Vec<Receiver>> {
        columns
            .iter()
            .map(|column| {
                let field = self.model.field(column)?;
                let ty = self
                    .converter
                    .as_ref()
                    .and_then(|converter| converter.column_type(column));

                Ok(match ty {
                    Some(ty) => Receiver::new(ty, field.nullable()),
                    None => field.receiver(),
                })
            })
            .collect()
    }

    /// Builds a record from one scanned row and returns it with the value of
    /// `key_column`.
    pub fn pack<M: Record>(
        &self,
        columns: &[String],
        values: Vec<Value>,
        key_column: &str,
    ) -> Result<(M, Value)> {
        if columns.len() != values.len() {
            return Err(err!(
                "row has {} values for {} columns",
                values.len(),
                columns.len()
            ));
        }

        let mut record = M::blank();
        let mut key = None;

        for (column, value) in columns.iter().zip(values) {
            let index = self.model.field_index(column)?;
            let value = match &self.converter {
                Some(converter) => converter.from_db(column, value)?,
                None => value,
            };

            if column == key_column {
                key = Some(value.clone());
            }

            self.assign(&mut record, index, value)?;
        }

        let Some(key) = key else {
            return Err(nexus_core::Error::field_not_defined(
                &self.model.table,
                key_column,
            ));
        };

        record.base_mut().set_fresh(false);
        Ok((record, key))
    }

    /// Column values to persist, in declaration order.
    pub fn extract<M: Record>(&self, record: &M) -> Result<IndexMap<String, Value>> {
        self.model
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let value = self.to_db(field, record.get(index)?)?;
                Ok((field.column.clone(), value))
            })
            .collect()
    }

    /// The value of one column as it would be written.
    pub fn db_value<M: Record>(&self, record: &M, column: &str) -> Result<Value> {
        let index = self.model.field_index(column)?;
        self.to_db(&self.model.fields[index], record.get(index)?)
    }

    pub fn col_value<M: Record>(&self, record: &M, column: &str) -> Result<Value> {
        let index = self.model.field_index(column)?;
        record.get(index)
    }

    pub fn set_value<M: Record>(&self, record: &mut M, column: &str, value: Value) -> Result<()> {
        let index = self.model.field_index(column)?;
        self.assign(record, index, value)
    }

    pub fn fill<M, K>(
        &self,
        record: &mut M,
        values: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<()>
    where
        M: Record,
        K: AsRef<str>,
    {
        for (column, value) in values {
            let Ok(index) = self.model.field_index(column.as_ref()) else {
                continue;
            };

            if value.is_null() || self.model.fields[index].options.protected {
                continue;
            }

            self.assign(record, index, value)?;
        }

        Ok(())
    }

    pub fn to_map<M: Record>(&self, record: &M) -> Result<IndexMap<String, Value>> {
        self.model
            .fields
            .iter()
            .enumerate()
            .filter(|(_, field)| !field.options.protected)
            .map(|(index, field)| Ok((field.column.clone(), record.get(index)?)))
            .collect()
    }

    fn assign<M: Record>(&self, record: &mut M, index: usize, value: Value) -> Result<()> {
        let field = &self.model.fields[index];

        let value = if value.is_null() && !field.optional {
            field.ty.zero()
        } else {
            value
        };

        record
            .set(index, value)
            .map_err(|e| e.context(err!("column `{}`", field.column)))
    }

    fn to_db(&self, field: &FieldDescriptor, value: Value) -> Result<Value> {
        let value = if value.is_zero_timestamp() {
            Value::Null
        } else {
            value
        };

        match &self.converter {
            Some(converter) => converter.to_db(&field.column, value),
            None => Ok(value),
        }
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("model", &self.model)
            .field("converter", &self.converter.is_some())
            .finish()
    }
}
