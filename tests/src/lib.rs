mod db_test;
pub use db_test::DbTest;

mod exec_log;
pub use exec_log::ExecLog;

pub mod fixtures;

mod logging_driver;
pub use logging_driver::{LoggingConnection, LoggingDriver};

pub mod prelude;

pub use std_util::*;

use nexus::{Db, Model};

#[macro_export]
macro_rules! models {
    (
        $( $model:ident ),*
    ) => {{
        let mut builder = nexus::Db::builder();
        $( builder.register::<$model>(); )*
        builder
    }};
}

/// Creates the table of `M`.
pub fn create_table<M: Model>(db: &Db) {
    db.repo::<M>().unwrap().create_table().unwrap();
}
