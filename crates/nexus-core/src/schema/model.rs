use super::FieldDescriptor;
use crate::{Error, Result};

use std::collections::HashMap;

/// The descriptor set of one record type.
#[derive(Debug, Clone)]
pub struct Model {
    /// Unprefixed table name
    pub table: String,

    /// Field descriptors, in declaration order
    pub fields: Vec<FieldDescriptor>,

    by_column: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    primary_key: usize,
}

impl Model {
    pub fn new(table: impl Into<String>, fields: Vec<FieldDescriptor>) -> Result<Model> {
        let table = table.into();
        let mut by_column = HashMap::with_capacity(fields.len());
        let mut by_name = HashMap::with_capacity(fields.len());
        let mut primary_key = None;

        for (index, field) in fields.iter().enumerate() {
            if by_column.insert(field.column.clone(), index).is_some() {
                return Err(Error::invalid_schema(format!(
                    "column `{}` is mapped twice on `{table}`",
                    field.column
                )));
            }

            by_name.insert(field.name.clone(), index);

            if field.is_primary_key() && primary_key.replace(index).is_some() {
                return Err(Error::invalid_schema(format!(
                    "`{table}` declares more than one primary key"
                )));
            }
        }

        let Some(primary_key) = primary_key else {
            return Err(Error::invalid_schema(format!(
                "`{table}` has no primary key; mark one field with `pk`"
            )));
        };

        Ok(Model {
            table,
            fields,
            by_column,
            by_name,
            primary_key,
        })
    }

    /// Looks up a field by column name.
    pub fn field(&self, column: &str) -> Result<&FieldDescriptor> {
        self.field_index(column).map(|index| &self.fields[index])
    }

    pub fn field_index(&self, column: &str) -> Result<usize> {
        self.by_column
            .get(column)
            .copied()
            .ok_or_else(|| Error::field_not_defined(&self.table, column))
    }

    /// Looks up a field by struct field name.
    pub fn field_by_name(&self, name: &str) -> Result<&FieldDescriptor> {
        self.by_name
            .get(name)
            .map(|index| &self.fields[*index])
            .ok_or_else(|| Error::field_not_defined(&self.table, name))
    }

    pub fn contains(&self, column: &str) -> bool {
        self.by_column.contains_key(column)
    }

    pub fn primary_key(&self) -> &FieldDescriptor {
        &self.fields[self.primary_key]
    }

    pub fn primary_key_index(&self) -> usize {
        self.primary_key
    }

    /// Column names in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|field| &field.column[..])
    }
}
