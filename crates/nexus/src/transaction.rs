use crate::{Db, Result};

use nexus_core::{driver::Connection, err, Error};

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

/// An open database transaction on its own connection.
///
/// Handles are cheap to clone and all refer to the same transaction. Once
/// committed or rolled back, every further statement fails with a
/// `transaction closed` error. If the last handle is dropped while the
/// transaction is still open, it is rolled back.
#[derive(Clone)]
pub struct Transaction {
    db: Db,
    inner: Arc<Inner>,
}

struct Inner {
    conn: Mutex<Box<dyn Connection>>,
    open: AtomicBool,
}

impl Transaction {
    pub(crate) fn begin(db: &Db) -> Result<Transaction> {
        let mut conn = db.driver().connect()?;
        conn.begin()?;

        tracing::info!(event = "begin", "nexus.transaction");

        Ok(Transaction {
            db: db.clone(),
            inner: Arc::new(Inner {
                conn: Mutex::new(conn),
                open: AtomicBool::new(true),
            }),
        })
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn is_open(&self) -> bool {
        self.inner.open.load(Ordering::Acquire)
    }

    pub fn commit(self) -> Result<()> {
        self.finish("commit", |conn| conn.commit())
    }

    pub fn rollback(self) -> Result<()> {
        self.finish("rollback", |conn| conn.rollback())
    }

    fn finish(
        &self,
        event: &'static str,
        f: impl FnOnce(&mut dyn Connection) -> Result<()>,
    ) -> Result<()> {
        self.with_connection(f)?;
        self.inner.open.store(false, Ordering::Release);

        tracing::info!(event = event, "nexus.transaction");
        Ok(())
    }

    pub(crate) fn with_connection<R>(
        &self,
        f: impl FnOnce(&mut dyn Connection) -> Result<R>,
    ) -> Result<R> {
        let mut conn = self
            .inner
            .conn
            .lock()
            .map_err(|_| err!("transaction connection lock poisoned"))?;

        if !self.is_open() {
            return Err(Error::transaction_closed());
        }

        f(&mut **conn)
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if !*self.open.get_mut() {
            return;
        }

        tracing::warn!("nexus.transaction: dropped while open; rolling back");

        if let Ok(conn) = self.conn.get_mut() {
            if let Err(err) = conn.rollback() {
                tracing::warn!(error = %err, "nexus.transaction: rollback failed");
            }
        }
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("open", &self.is_open())
            .finish()
    }
}
