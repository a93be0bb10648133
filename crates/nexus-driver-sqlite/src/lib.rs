mod value;
pub(crate) use value::Value;

use nexus_core::{
    driver::{Dialect, Driver, Scan},
    stmt, Error, Result,
};
use rusqlite::Connection as RusqliteConnection;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    time::Duration,
};
use tempfile::TempDir;
use url::Url;

/// How long a connection waits on another connection's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct Sqlite {
    target: Target,
}

#[derive(Debug)]
enum Target {
    File(PathBuf),

    /// Scratch database in a private directory, removed with the driver
    Scratch { dir: TempDir, path: PathBuf },
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={}",
                url_str
            )));
        }

        if url.path() == ":memory:" {
            Self::in_memory()
        } else {
            Ok(Self::open(url.path()))
        }
    }

    /// Create a private scratch database for `sqlite::memory:`.
    ///
    /// Every connection opened by the driver sees the same database, which
    /// lives as long as the driver. The database runs in WAL mode, so a
    /// connection reading outside an open transaction sees the last
    /// committed state instead of failing on the transaction's locks.
    pub fn in_memory() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("nexus-")
            .tempdir()
            .map_err(Error::driver_operation_failed)?;
        let path = dir.path().join("scratch.db");

        Ok(Sqlite {
            target: Target::Scratch { dir, path },
        })
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Sqlite {
            target: Target::File(path.as_ref().to_path_buf()),
        }
    }
}

impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match &self.target {
            Target::Scratch { .. } => Cow::Borrowed("sqlite::memory:"),
            Target::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn connect(&self) -> Result<Box<dyn nexus_core::Connection>> {
        let connection = match &self.target {
            Target::File(path) => Connection::open(path)?,
            Target::Scratch { dir, path } => {
                let connection = Connection::open(path)?;
                connection.wal()?;
                tracing::trace!(dir = %dir.path().display(), "nexus.sqlite.scratch");
                connection
            }
        };

        tracing::debug!(url = %self.url(), "nexus.sqlite.connect");
        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;
        Ok(Self { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .map_err(Error::driver_operation_failed)?;
        Ok(Self { connection })
    }

    /// Switches the database to write-ahead logging.
    fn wal(&self) -> Result<()> {
        let mode: String = self
            .connection
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(Error::driver_operation_failed)?;

        if !mode.eq_ignore_ascii_case("wal") {
            return Err(nexus_core::err!("sqlite refused WAL mode; journal_mode={mode}"));
        }

        Ok(())
    }
}

impl nexus_core::driver::Connection for Connection {
    fn exec(&mut self, sql: &str, params: &[stmt::Value]) -> Result<u64> {
        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::driver_operation_failed)?;

        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter().map(Value)))
            .map_err(Error::driver_operation_failed)?;

        Ok(count as u64)
    }

    fn query(&mut self, sql: &str, params: &[stmt::Value], scan: &mut dyn Scan) -> Result<()> {
        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::driver_operation_failed)?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let receivers = scan.columns(&columns)?;
        debug_assert_eq!(receivers.len(), columns.len());

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter().map(Value)))
            .map_err(Error::driver_operation_failed)?;

        while let Some(row) = rows.next().map_err(Error::driver_operation_failed)? {
            let mut items = Vec::with_capacity(receivers.len());

            for (index, receiver) in receivers.iter().enumerate() {
                let raw = Value::from_sql(row, index)?;
                items.push(receiver.accept(&columns[index], raw)?);
            }

            scan.row(items)?;
        }

        Ok(())
    }
}
