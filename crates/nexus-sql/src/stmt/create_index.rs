use super::Statement;

#[derive(Debug, Clone)]
pub struct CreateIndex {
    /// Name of the index
    pub name: String,

    /// Which table to index
    pub on: String,

    /// The columns to index
    pub columns: Vec<String>,

    /// When true, the index is unique
    pub unique: bool,
}

impl Statement {
    /// Creates an index named `ui_<table>_<column>` (unique) or
    /// `i_<table>_<column>`.
    pub fn create_index(table: &str, column: &str, unique: bool) -> Self {
        let prefix = if unique { "ui" } else { "i" };

        CreateIndex {
            name: format!("{prefix}_{table}_{column}"),
            on: table.to_string(),
            columns: vec![column.to_string()],
            unique,
        }
        .into()
    }
}

impl From<CreateIndex> for Statement {
    fn from(value: CreateIndex) -> Self {
        Self::CreateIndex(value)
    }
}
