mod builder;
pub use builder::Builder;

mod connect;
pub use connect::driver;

use crate::{AsExecutor, Model, Repo, Result, Transaction};

use nexus_core::{
    driver::{Connection, Driver},
    err,
};
use nexus_sql::Serializer;

use std::{
    fmt,
    sync::{Arc, Mutex},
};

/// Shared state between all `Db` clones.
struct Shared {
    driver: Box<dyn Driver>,
    serializer: Serializer,
    table_name_prefix: String,

    /// Ambient connection, opened on first use
    conn: Mutex<Option<Box<dyn Connection>>>,
}

/// A database handle. Clones share the driver and the ambient connection.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(crate) fn new(driver: Box<dyn Driver>, table_name_prefix: String) -> Db {
        Db {
            shared: Arc::new(Shared {
                serializer: Serializer::for_dialect(driver.dialect()),
                driver,
                table_name_prefix,
                conn: Mutex::new(None),
            }),
        }
    }

    pub fn repo<M: Model>(&self) -> Result<Repo<M>> {
        Repo::new(self.executor())
    }

    /// Starts a transaction on a dedicated connection.
    pub fn begin(&self) -> Result<Transaction> {
        Transaction::begin(self)
    }

    /// Runs `f` inside a transaction, committing when it returns `Ok` and
    /// rolling back when it returns `Err`.
    pub fn transaction<T>(&self, f: impl FnOnce(&Transaction) -> Result<T>) -> Result<T> {
        let tx = self.begin()?;

        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback() {
                    tracing::warn!(error = %rollback, "nexus.transaction: rollback failed");
                }
                Err(err)
            }
        }
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }

    pub fn table_name_prefix(&self) -> &str {
        &self.shared.table_name_prefix
    }

    pub(crate) fn serializer(&self) -> &Serializer {
        &self.shared.serializer
    }

    pub(crate) fn with_connection<R>(
        &self,
        f: impl FnOnce(&mut dyn Connection) -> Result<R>,
    ) -> Result<R> {
        let mut conn = self
            .shared
            .conn
            .lock()
            .map_err(|_| err!("connection lock poisoned"))?;

        let conn = match &mut *conn {
            Some(conn) => conn,
            slot @ None => slot.insert(self.shared.driver.connect()?),
        };

        f(&mut **conn)
    }
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db")
            .field("driver", &self.shared.driver)
            .field("table_name_prefix", &self.shared.table_name_prefix)
            .finish()
    }
}
