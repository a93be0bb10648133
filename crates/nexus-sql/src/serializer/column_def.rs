use super::{Formatter, Ident, Params, ToSql};

use crate::stmt::ColumnDef;

impl ToSql for &ColumnDef {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let not_null = if self.not_null { " NOT NULL" } else { "" };
        fmt!(f, Ident(&self.name) " " {&self.ty} not_null);
    }
}
