use crate::Result;

use nexus_core::{Driver, Error};

use url::Url;

/// Resolves a driver from a connection URL.
pub fn driver(url: &str) -> Result<Box<dyn Driver>> {
    let parsed =
        Url::parse(url).map_err(|err| Error::invalid_connection_url(format!("{url}: {err}")))?;

    match parsed.scheme() {
        "sqlite" => connect_sqlite(url),
        scheme => Err(Error::invalid_connection_url(format!(
            "unsupported database; scheme={scheme}; url={url}"
        ))),
    }
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(nexus_driver_sqlite::Sqlite::new(url)?))
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &str) -> Result<Box<dyn Driver>> {
    Err(Error::invalid_connection_url("`sqlite` feature not enabled"))
}
