//! Common imports for test files
//!
//! This module provides a convenient way to import frequently used items
//! in test files with `use tests::prelude::*;`

pub use crate::fixtures::{Book, Profile, User};
pub use crate::{create_table, models, DbTest};

pub use nexus::{Base, Db, Direction, ModelExt, Nexus, Op, Record, Relations, Value};
pub use std_util::prelude::*;
