use super::{Comma, Formatter, Ident, Params, ToSql};

use crate::stmt::Condition;

impl ToSql for &Condition {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            Condition::Compare { column, op, value } => {
                fmt!(f, Ident(column) " " op.as_str() " " value);
            }
            Condition::InList { values, .. } if values.is_empty() => {
                fmt!(f, "1 = 0");
            }
            Condition::InList { column, values } => {
                fmt!(f, Ident(column) " IN (" Comma(values) ")");
            }
            Condition::IsNull {
                column,
                negate: false,
            } => {
                fmt!(f, Ident(column) " IS NULL");
            }
            Condition::IsNull { column, negate: true } => {
                fmt!(f, Ident(column) " IS NOT NULL");
            }
        }
    }
}

/// ` WHERE a AND b`, or nothing for an empty filter.
pub(super) struct Where<'a>(pub(super) &'a [Condition]);

impl ToSql for Where<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        if self.0.is_empty() {
            return;
        }

        fmt!(f, " WHERE " super::delim::Delimited(self.0, " AND "));
    }
}
