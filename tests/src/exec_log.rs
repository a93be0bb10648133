use std::sync::{Arc, Mutex};

/// A view over the statement log that provides a clean API for tests
pub struct ExecLog {
    statements: Arc<Mutex<Vec<String>>>,
}

impl ExecLog {
    pub(crate) fn new(statements: Arc<Mutex<Vec<String>>>) -> Self {
        Self { statements }
    }

    /// Get the number of logged statements
    pub fn len(&self) -> usize {
        self.statements.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.lock().unwrap().is_empty()
    }

    /// Check if any statement matches the given predicate
    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .any(|sql| predicate(sql))
    }

    /// Count statements matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .filter(|sql| predicate(sql))
            .count()
    }

    /// Number of `SELECT` statements reading `table`
    pub fn selects_from(&self, table: &str) -> usize {
        let from = format!("FROM \"{table}\"");
        self.count(|sql| sql.starts_with("SELECT") && sql.contains(&from))
    }

    /// Clear the log
    pub fn clear(&mut self) {
        self.statements.lock().unwrap().clear();
    }

    /// Remove and return the first statement from the log
    pub fn pop(&mut self) -> Option<String> {
        let mut statements = self.statements.lock().unwrap();
        if statements.is_empty() {
            None
        } else {
            Some(statements.remove(0))
        }
    }

    /// Remove and return the most recent statement
    pub fn pop_last(&mut self) -> Option<String> {
        self.statements.lock().unwrap().pop()
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}
