use super::{Condition, Statement};

#[derive(Debug, Clone)]
pub struct Select {
    pub table: String,
    pub projection: Projection,

    /// Conditions, joined with `AND`
    pub filter: Vec<Condition>,

    pub group_by: Vec<String>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// The listed columns
    Columns(Vec<String>),

    /// `COUNT(1)`
    Count,

    /// `<column>, COUNT(1)`, grouped by the column
    CountBy(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Select {
    pub fn new(table: impl Into<String>, projection: Projection) -> Select {
        Select {
            table: table.into(),
            projection,
            filter: vec![],
            group_by: vec![],
            order_by: vec![],
            limit: None,
            offset: None,
        }
    }

    pub fn columns<I, S>(table: impl Into<String>, columns: I) -> Select
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Select::new(
            table,
            Projection::Columns(columns.into_iter().map(Into::into).collect()),
        )
    }

    pub fn filter(mut self, condition: Condition) -> Select {
        self.filter.push(condition);
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Select {
        self.order_by.push(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}
