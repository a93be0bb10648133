use crate::{ExecLog, LoggingDriver};

use nexus::{db, Db};

use std::sync::{Arc, Mutex};

/// Builds databases on a fresh in-memory SQLite store and records every
/// statement they issue.
pub struct DbTest {
    log: ExecLog,
}

impl DbTest {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Self {
            log: ExecLog::new(Arc::new(Mutex::new(vec![]))),
        }
    }

    pub fn setup_db(&mut self, mut builder: db::Builder) -> Db {
        let driver = LoggingDriver::new(db::driver("sqlite::memory:").unwrap());
        self.log = ExecLog::new(driver.log_handle());
        builder.build(driver).unwrap()
    }

    pub fn log(&mut self) -> &mut ExecLog {
        &mut self.log
    }
}

impl Default for DbTest {
    fn default() -> Self {
        Self::new()
    }
}
