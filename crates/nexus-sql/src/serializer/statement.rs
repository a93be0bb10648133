use super::{condition::Where, Comma, Formatter, Ident, Params, ToSql};

use crate::stmt::{self, Direction, Projection, Statement};

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Statement::CreateIndex(stmt) => stmt.to_sql(f),
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::DropTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

struct ColumnsWithConstraints<'a>(&'a stmt::CreateTable);

impl ToSql for ColumnsWithConstraints<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        for (index, column) in self.0.columns.iter().enumerate() {
            fmt!(f, "\n    " column);
            if index < self.0.columns.len() - 1 {
                fmt!(f, ",");
            }
        }

        match &self.0.primary_key {
            Some(pk) => fmt!(f, ",\n    PRIMARY KEY (" Ident(pk) ")\n"),
            None => fmt!(f, "\n"),
        }
    }
}

impl ToSql for &stmt::CreateTable {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let if_not_exists = if self.if_not_exists {
            "IF NOT EXISTS "
        } else {
            ""
        };
        let columns = ColumnsWithConstraints(self);

        fmt!(f, "CREATE TABLE " if_not_exists Ident(&self.name) " (" columns ")");
    }
}

impl ToSql for &stmt::CreateIndex {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let unique = if self.unique { "UNIQUE " } else { "" };
        let columns = Comma(self.columns.iter().map(Ident));

        fmt!(
            f, "CREATE " unique "INDEX " Ident(&self.name) " ON " Ident(&self.on) " (" columns ")"
        );
    }
}

impl ToSql for &stmt::DropTable {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let if_exists = if self.if_exists { "IF EXISTS " } else { "" };
        fmt!(f, "DROP TABLE " if_exists Ident(&self.name));
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "DELETE FROM " Ident(&self.table) Where(&self.filter));
    }
}

struct Row<'a>(&'a [stmt::Value]);

impl ToSql for Row<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "(" Comma(self.0) ")");
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let columns = Comma(self.columns.iter().map(Ident));
        let rows = Comma(self.rows.iter().map(|row| Row(row)));

        fmt!(f, "INSERT INTO " Ident(&self.table) " (" columns ") VALUES " rows);
    }
}

struct Assignment<'a>(&'a str, &'a stmt::Value);

impl ToSql for Assignment<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(self.0) " = " self.1);
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let assignments = Comma(
            self.assignments
                .iter()
                .map(|(column, value)| Assignment(column, value)),
        );

        fmt!(f, "UPDATE " Ident(&self.table) " SET " assignments Where(&self.filter));
    }
}

impl ToSql for &Projection {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Projection::Columns(columns) => fmt!(f, Comma(columns.iter().map(Ident))),
            Projection::Count => fmt!(f, "COUNT(1)"),
            Projection::CountBy(column) => fmt!(f, Ident(column) ", COUNT(1)"),
        }
    }
}

impl ToSql for &stmt::OrderBy {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let direction = match self.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        };
        fmt!(f, Ident(&self.column) direction);
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "SELECT " {&self.projection} " FROM " Ident(&self.table) Where(&self.filter));

        let mut group_by: Vec<&str> = self.group_by.iter().map(String::as_str).collect();
        if let Projection::CountBy(column) = &self.projection {
            if !group_by.contains(&column.as_str()) {
                group_by.push(column);
            }
        }

        if !group_by.is_empty() {
            fmt!(f, " GROUP BY " Comma(group_by.into_iter().map(Ident)));
        }

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY " Comma(&self.order_by));
        }

        match (self.limit, self.offset) {
            (Some(limit), None) => fmt!(f, " LIMIT " limit),
            (Some(limit), Some(offset)) => fmt!(f, " LIMIT " limit " OFFSET " offset),
            (None, Some(offset)) if f.serializer.is_sqlite() => {
                fmt!(f, " LIMIT -1 OFFSET " offset)
            }
            (None, Some(offset)) if f.serializer.is_mysql() => {
                fmt!(f, " LIMIT 18446744073709551615 OFFSET " offset)
            }
            (None, Some(offset)) => fmt!(f, " OFFSET " offset),
            (None, None) => {}
        }
    }
}
