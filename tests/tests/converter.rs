use tests::prelude::*;

use nexus::{Model, Result, Type, ValueConverter};
use pretty_assertions::assert_eq;

/// Stores booleans as `Y`/`N`.
struct YesNo;

impl ValueConverter for YesNo {
    fn to_db(&self, column: &str, value: Value) -> Result<Value> {
        match (column, value) {
            ("active", Value::Bool(active)) => {
                Ok(Value::from(if active { "Y" } else { "N" }))
            }
            (_, value) => Ok(value),
        }
    }

    fn from_db(&self, column: &str, value: Value) -> Result<Value> {
        match (column, value) {
            ("active", Value::String(flag)) => Ok(Value::Bool(flag == "Y")),
            (_, value) => Ok(value),
        }
    }

    fn column_type(&self, column: &str) -> Option<Type> {
        (column == "active").then_some(Type::String)
    }
}

#[derive(Debug, Default, Record)]
struct Flag {
    #[column("id int pk")]
    id: i64,

    #[column("active varchar(1)")]
    active: bool,

    base: Base,
}

impl Model for Flag {
    const TABLE: &'static str = "flags";

    fn converter() -> Option<Box<dyn ValueConverter>> {
        Some(Box::new(YesNo))
    }
}

#[test]
fn converter_applies_in_both_directions() {
    let mut test = DbTest::new();
    let db = test.setup_db(models!(Flag));
    create_table::<Flag>(&db);

    let flags = db.repo::<Flag>().unwrap();
    assert_ok!(flags.create_all([
        &mut Flag {
            id: 1,
            active: true,
            ..Flag::default()
        },
        &mut Flag {
            id: 2,
            active: false,
            ..Flag::default()
        },
    ]));

    // Raw column values carry the converted form
    let mut raw = db.repo::<Flag>().unwrap();
    assert_eq!(assert_ok!(raw.filter("active", "Y").count()), 1);

    assert!(assert_ok!(flags.get(1)).active);
    assert!(!assert_ok!(flags.get(2)).active);
}

#[test]
fn db_value_reflects_conversion() {
    let flags = Flag {
        id: 1,
        active: true,
        ..Flag::default()
    };

    assert_eq!(assert_ok!(flags.column_value("active")), Value::Bool(true));

    let schema = assert_ok!(nexus::Schema::of::<Flag>());
    assert_eq!(
        assert_ok!(schema.mapper().db_value(&flags, "active")),
        Value::from("Y")
    );
}
