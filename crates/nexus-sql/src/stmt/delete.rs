use super::{Condition, Statement};

#[derive(Debug, Clone)]
pub struct Delete {
    pub table: String,

    /// Conditions, joined with `AND`. An empty filter deletes every row.
    pub filter: Vec<Condition>,
}

impl Delete {
    pub fn new(table: impl Into<String>) -> Delete {
        Delete {
            table: table.into(),
            filter: vec![],
        }
    }

    pub fn filter(mut self, condition: Condition) -> Delete {
        self.filter.push(condition);
        self
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
