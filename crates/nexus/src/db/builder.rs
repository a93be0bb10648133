use super::{connect, Db};
use crate::{Model, Result, Schema};

use nexus_core::Driver;

/// Configures and opens a [`Db`].
#[derive(Default)]
pub struct Builder {
    /// Schema checks for the registered record types
    models: Vec<fn() -> Result<()>>,

    table_name_prefix: Option<String>,
}

impl Builder {
    /// Registers a record type. Its schema and relationships are validated
    /// when the database is built.
    pub fn register<M: Model>(&mut self) -> &mut Self {
        self.models.push(verify::<M>);
        self
    }

    /// Set the table name prefix for all tables
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    /// Builds a database for the driver selected by the URL scheme.
    pub fn connect(&mut self, url: &str) -> Result<Db> {
        self.finish(connect::driver(url)?)
    }

    pub fn build(&mut self, driver: impl Driver) -> Result<Db> {
        self.finish(Box::new(driver))
    }

    fn finish(&mut self, driver: Box<dyn Driver>) -> Result<Db> {
        for verify in &self.models {
            verify()?;
        }

        tracing::debug!(
            url = %driver.url(),
            models = self.models.len(),
            "nexus.build"
        );

        Ok(Db::new(
            driver,
            self.table_name_prefix.clone().unwrap_or_default(),
        ))
    }
}

fn verify<M: Model>() -> Result<()> {
    Schema::of::<M>()?.verify()
}
