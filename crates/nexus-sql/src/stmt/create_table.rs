use super::{ColumnDef, Statement};

/// A statement to create a SQL table.
#[derive(Debug, Clone)]
pub struct CreateTable {
    /// Name of the table
    pub name: String,

    /// Column definitions
    pub columns: Vec<ColumnDef>,

    /// Primary key column
    pub primary_key: Option<String>,

    /// Whether or not to add an `IF NOT EXISTS` clause.
    pub if_not_exists: bool,
}

impl Statement {
    pub fn create_table(
        name: impl Into<String>,
        columns: Vec<ColumnDef>,
        primary_key: Option<String>,
    ) -> Self {
        CreateTable {
            name: name.into(),
            columns,
            primary_key,
            if_not_exists: false,
        }
        .into()
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
