use crate::{Db, Model, Repo, Result, Transaction};

use nexus_core::driver::{Connection, Scan};
use nexus_sql::{stmt::Select, Statement};

/// Issues statements either on a database's ambient connection or inside a
/// transaction.
#[derive(Debug, Clone)]
pub struct Executor {
    db: Db,
    tx: Option<Transaction>,
}

impl Executor {
    pub(crate) fn new(db: Db, tx: Option<Transaction>) -> Executor {
        Executor { db, tx }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// The transaction statements are bound to, if any.
    pub fn transaction(&self) -> Option<&Transaction> {
        self.tx.as_ref()
    }

    pub fn repo<M: Model>(&self) -> Result<Repo<M>> {
        Repo::new(self.clone())
    }

    /// The table name with the configured prefix applied.
    pub fn table_name(&self, table: &str) -> String {
        format!("{}{table}", self.db.table_name_prefix())
    }

    /// Executes a statement that returns no rows, returning the number of
    /// affected rows.
    pub fn exec(&self, stmt: impl Into<Statement>) -> Result<u64> {
        let stmt = stmt.into();
        let mut params = vec![];
        let sql = self.db.serializer().serialize(&stmt, &mut params);

        tracing::debug!(sql = %sql, params = params.len(), "nexus.exec");
        self.with_connection(|conn| conn.exec(&sql, &params))
    }

    pub fn query(&self, stmt: Select, scan: &mut dyn Scan) -> Result<()> {
        let stmt = Statement::Select(stmt);
        let mut params = vec![];
        let sql = self.db.serializer().serialize(&stmt, &mut params);

        tracing::debug!(sql = %sql, params = params.len(), "nexus.query");
        self.with_connection(|conn| conn.query(&sql, &params, scan))
    }

    fn with_connection<R>(&self, f: impl FnOnce(&mut dyn Connection) -> Result<R>) -> Result<R> {
        match &self.tx {
            Some(tx) => tx.with_connection(f),
            None => self.db.with_connection(f),
        }
    }
}

/// Anything statements can be issued through.
pub trait AsExecutor {
    fn executor(&self) -> Executor;
}

impl AsExecutor for Executor {
    fn executor(&self) -> Executor {
        self.clone()
    }
}

impl AsExecutor for Db {
    fn executor(&self) -> Executor {
        Executor::new(self.clone(), None)
    }
}

impl AsExecutor for Transaction {
    fn executor(&self) -> Executor {
        Executor::new(self.db().clone(), Some(self.clone()))
    }
}
