mod receiver;
pub use receiver::Receiver;

use crate::{stmt::Value, Result};

use std::{borrow::Cow, fmt::Debug};

/// The SQL dialect spoken by a driver. Statement serialization follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgresql,
    Mysql,
}

pub trait Driver: Debug + Send + Sync + 'static {
    /// Returns the URL this driver connects to.
    fn url(&self) -> Cow<'_, str>;

    /// The dialect statements must be serialized in.
    fn dialect(&self) -> Dialect;

    /// Opens a new connection.
    fn connect(&self) -> Result<Box<dyn Connection>>;
}

/// A single database connection. Statements arrive as SQL text with
/// positional parameters.
pub trait Connection: Debug + Send + 'static {
    /// Executes a statement that returns no rows, returning the number of
    /// affected rows.
    fn exec(&mut self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Executes a query, feeding the result set to `scan`.
    fn query(&mut self, sql: &str, params: &[Value], scan: &mut dyn Scan) -> Result<()>;

    fn begin(&mut self) -> Result<()> {
        self.exec("BEGIN", &[]).map(|_| ())
    }

    fn commit(&mut self) -> Result<()> {
        self.exec("COMMIT", &[]).map(|_| ())
    }

    fn rollback(&mut self) -> Result<()> {
        self.exec("ROLLBACK", &[]).map(|_| ())
    }
}

/// Sink for a query's result set.
///
/// The connection first announces the result columns and receives one
/// [`Receiver`] per column, then passes every row through those receivers
/// before handing it to [`Scan::row`].
pub trait Scan {
    fn columns(&mut self, columns: &[String]) -> Result<Vec<Receiver>>;

    fn row(&mut self, values: Vec<Value>) -> Result<()>;
}
