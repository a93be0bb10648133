use nexus_core::{
    driver::{Connection, Dialect, Driver, Scan},
    stmt::Value,
    Result,
};

use std::{
    borrow::Cow,
    sync::{Arc, Mutex},
};

#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,

    /// SQL of every statement issued through any connection of this driver
    log: Arc<Mutex<Vec<String>>>,
}

impl LoggingDriver {
    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self {
            inner: driver,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a handle to access the statement log
    pub fn log_handle(&self) -> Arc<Mutex<Vec<String>>> {
        self.log.clone()
    }
}

impl Driver for LoggingDriver {
    fn url(&self) -> Cow<'_, str> {
        self.inner.url()
    }

    fn dialect(&self) -> Dialect {
        self.inner.dialect()
    }

    fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(LoggingConnection {
            inner: self.inner.connect()?,
            log: self.log_handle(),
        }))
    }
}

/// A connection wrapper that records every statement before forwarding it
#[derive(Debug)]
pub struct LoggingConnection {
    inner: Box<dyn Connection>,
    log: Arc<Mutex<Vec<String>>>,
}

impl LoggingConnection {
    fn record(&self, sql: &str) {
        self.log
            .lock()
            .expect("Failed to acquire statement log lock")
            .push(sql.to_string());
    }
}

impl Connection for LoggingConnection {
    fn exec(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        self.record(sql);
        self.inner.exec(sql, params)
    }

    fn query(&mut self, sql: &str, params: &[Value], scan: &mut dyn Scan) -> Result<()> {
        self.record(sql);
        self.inner.query(sql, params, scan)
    }

    fn begin(&mut self) -> Result<()> {
        self.record("BEGIN");
        self.inner.begin()
    }

    fn commit(&mut self) -> Result<()> {
        self.record("COMMIT");
        self.inner.commit()
    }

    fn rollback(&mut self) -> Result<()> {
        self.record("ROLLBACK");
        self.inner.rollback()
    }
}
