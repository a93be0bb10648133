use super::{Statement, Value};

/// A multi-row `INSERT`. Every row holds one value per column, in column
/// order.
#[derive(Debug, Clone)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Insert {
    pub fn new(table: impl Into<String>, columns: Vec<String>) -> Insert {
        Insert {
            table: table.into(),
            columns,
            rows: vec![],
        }
    }

    pub fn row(mut self, values: Vec<Value>) -> Insert {
        debug_assert_eq!(values.len(), self.columns.len());
        self.rows.push(values);
        self
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
