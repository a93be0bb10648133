use super::Value;

/// A single predicate of a `WHERE` clause. Multiple conditions are joined
/// with `AND`.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column <op> value`
    Compare {
        column: String,
        op: Op,
        value: Value,
    },

    /// `column IN (values...)`. An empty list matches nothing.
    InList { column: String, values: Vec<Value> },

    /// `column IS NULL` or `column IS NOT NULL`
    IsNull { column: String, negate: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
}

impl Condition {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Condition {
        Condition::compare(column, Op::Eq, value)
    }

    pub fn compare(column: impl Into<String>, op: Op, value: impl Into<Value>) -> Condition {
        let column = column.into();
        let value = value.into();

        // `= NULL` never matches
        match (op, value.is_null()) {
            (Op::Eq, true) => Condition::IsNull {
                column,
                negate: false,
            },
            (Op::Ne, true) => Condition::IsNull {
                column,
                negate: true,
            },
            _ => Condition::Compare { column, op, value },
        }
    }

    pub fn in_list(column: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Condition {
        Condition::InList {
            column: column.into(),
            values: values.into_iter().collect(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Condition::Compare { column, .. }
            | Condition::InList { column, .. }
            | Condition::IsNull { column, .. } => column,
        }
    }
}

impl Op {
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "<>",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Like => "LIKE",
        }
    }
}
