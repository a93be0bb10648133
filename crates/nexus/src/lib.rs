extern crate self as nexus;

mod base;
pub use base::Base;

pub mod db;
pub use db::Db;

mod engine;

mod executor;
pub use executor::{AsExecutor, Executor};

mod mapper;
pub use mapper::{Mapper, ValueConverter};

mod model;
pub use model::{FieldDef, Model, ModelExt, Record};

pub mod relation;
pub use relation::{Nexus, Relations};

mod repo;
pub use repo::{Page, Repo};

mod schema;
pub use schema::Schema;

pub mod stmt;
pub use stmt::Primitive;

mod transaction;
pub use transaction::Transaction;

pub use nexus_core::{bail, err, Error, Result};
pub use nexus_core::stmt::{Type, Value};
pub use nexus_sql::stmt::{Direction, Op};

pub use nexus_macros::Record;

#[doc(hidden)]
pub mod codegen_support {
    pub use crate::{Base, FieldDef, Primitive, Record, Result};
    pub use nexus_core::{
        stmt::{Type, Value},
        Error,
    };
    pub use std::{default::Default, vec::Vec};
}
