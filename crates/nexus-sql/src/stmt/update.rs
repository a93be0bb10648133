use super::{Condition, Statement, Value};

#[derive(Debug, Clone)]
pub struct Update {
    pub table: String,

    /// `SET` assignments, in order
    pub assignments: Vec<(String, Value)>,

    /// Conditions, joined with `AND`
    pub filter: Vec<Condition>,
}

impl Update {
    pub fn new(table: impl Into<String>) -> Update {
        Update {
            table: table.into(),
            assignments: vec![],
            filter: vec![],
        }
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Update {
        self.assignments.push((column.into(), value.into()));
        self
    }

    pub fn filter(mut self, condition: Condition) -> Update {
        self.filter.push(condition);
        self
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
