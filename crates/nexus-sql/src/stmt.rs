mod column_def;
pub use column_def::ColumnDef;

mod condition;
pub use condition::{Condition, Op};

mod create_index;
pub use create_index::CreateIndex;

mod create_table;
pub use create_table::CreateTable;

mod delete;
pub use delete::Delete;

mod drop_table;
pub use drop_table::DropTable;

mod insert;
pub use insert::Insert;

mod select;
pub use select::{Direction, OrderBy, Projection, Select};

mod update;
pub use update::Update;

pub use nexus_core::stmt::{Type, Value};

#[derive(Debug, Clone)]
pub enum Statement {
    CreateIndex(CreateIndex),
    CreateTable(CreateTable),
    DropTable(DropTable),
    Delete(Delete),
    Insert(Insert),
    Select(Select),
    Update(Update),
}

impl Statement {
    /// Returns `true` if the statement produces rows.
    pub fn is_query(&self) -> bool {
        matches!(self, Statement::Select(_))
    }

    /// Name of the table the statement targets.
    pub fn table(&self) -> &str {
        match self {
            Statement::CreateIndex(stmt) => &stmt.on,
            Statement::CreateTable(stmt) => &stmt.name,
            Statement::DropTable(stmt) => &stmt.name,
            Statement::Delete(stmt) => &stmt.table,
            Statement::Insert(stmt) => &stmt.table,
            Statement::Select(stmt) => &stmt.table,
            Statement::Update(stmt) => &stmt.table,
        }
    }
}
