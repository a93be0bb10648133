use tests::prelude::*;

use nexus::Model;
use pretty_assertions::assert_eq;

#[derive(Debug, Default, Record)]
struct Member {
    #[column("id int pk")]
    id: i64,

    #[column("email varchar(255) uk")]
    email: String,

    #[column("token text protected, nil")]
    token: Option<String>,

    #[column("score int")]
    score: i32,

    base: Base,
}

impl Model for Member {
    const TABLE: &'static str = "members";
}

#[test]
fn column_access_by_name() {
    let mut member = Member::default();

    assert!(member.has_column("email"));
    assert!(!member.has_column("password"));

    assert_ok!(member.set_column("email", "a@example.com"));
    assert_ok!(member.set_column("score", 12));
    assert_eq!(member.email, "a@example.com");
    assert_eq!(assert_ok!(member.column_value("score")), Value::I64(12));

    let err = assert_err!(member.set_column("password", "x"));
    assert!(err.is_field_not_defined());
}

#[test]
fn set_column_rejects_out_of_range_values() {
    let mut member = Member::default();
    let err = assert_err!(member.set_column("score", i64::MAX));
    assert!(err.is_type_conversion());
}

#[test]
fn fill_skips_protected_null_and_unknown() {
    let mut member = Member {
        email: "keep@example.com".into(),
        ..Member::default()
    };

    assert_ok!(member.fill([
        ("id", Value::I64(7)),
        ("email", Value::Null),
        ("token", Value::from("secret")),
        ("nickname", Value::from("ignored")),
        ("score", Value::I64(3)),
    ]));

    assert_eq!(member.id, 7);
    assert_eq!(member.email, "keep@example.com");
    assert_eq!(member.token, None);
    assert_eq!(member.score, 3);
}

#[test]
fn to_map_excludes_protected() {
    let member = Member {
        id: 1,
        email: "a@example.com".into(),
        token: Some("secret".into()),
        score: 5,
        ..Member::default()
    };

    let map = assert_ok!(member.to_map());
    assert_eq!(
        map.keys().map(String::as_str).collect::<Vec<_>>(),
        ["id", "email", "score"]
    );

    let json = serde_json::to_value(&map).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "id": 1, "email": "a@example.com", "score": 5 })
    );
}

fn seeded(test: &mut DbTest) -> Db {
    let db = test.setup_db(models!(Member));
    create_table::<Member>(&db);

    let members = db.repo::<Member>().unwrap();
    let mut batch: Vec<Member> = (1..=7)
        .map(|id| Member {
            id,
            email: format!("m{id}@example.com"),
            score: (id % 3) as i32,
            ..Member::default()
        })
        .collect();
    assert_ok!(members.create_all(batch.iter_mut()));

    db
}

#[test]
fn paginate_reports_totals() {
    let mut test = DbTest::new();
    let db = seeded(&mut test);

    let mut members = db.repo::<Member>().unwrap();
    members.order_by("id", Direction::Asc);

    let page = assert_ok!(members.paginate(3, 3));
    assert_eq!(page.total, 7);
    assert_eq!(page.pages(), 3);
    assert_eq!(page.records.iter().map(|m| m.id).collect::<Vec<_>>(), [7]);

    // Pages are one-based, page 0 reads the first page
    let page = assert_ok!(members.paginate(0, 3));
    assert_eq!(page.page, 1);
    assert_eq!(
        page.records.iter().map(|m| m.id).collect::<Vec<_>>(),
        [1, 2, 3]
    );

    assert_err!(members.paginate(1, 0));
}

#[test]
fn paginate_rejects_offsets_past_the_range() {
    let mut test = DbTest::new();
    let db = seeded(&mut test);
    let members = db.repo::<Member>().unwrap();

    test.log().clear();

    let err = assert_err!(members.paginate(u64::MAX, 10));
    assert!(err.to_string().contains("out of range"));

    // Offsets past the signed range are refused as well
    assert_err!(members.paginate(u64::MAX / 2, 2));

    // Nothing reaches the database
    assert!(test.log().is_empty());

    let page = assert_ok!(members.paginate(100, 10));
    assert!(page.records.is_empty());
    assert_eq!(page.total, 7);
}

#[test]
fn raw_update_and_delete() {
    let mut test = DbTest::new();
    let db = seeded(&mut test);

    let mut members = db.repo::<Member>().unwrap();

    members.filter("score", 0);
    assert_eq!(assert_ok!(members.update_raw([("score", 10)])), 2);

    let err = assert_err!(members.update_raw([("id", 99)]));
    assert!(err.to_string().contains("primary key"));

    assert_err!(members.update_raw(Vec::<(&str, Value)>::new()));

    members.clear().filter("score", 10);
    assert_eq!(assert_ok!(members.count()), 2);
    assert_eq!(assert_ok!(members.delete_raw()), 2);

    members.clear();
    assert_eq!(assert_ok!(members.count()), 5);
}

#[test]
fn fetch_by_key_keeps_last_row() {
    let mut test = DbTest::new();
    let db = seeded(&mut test);

    let mut members = db.repo::<Member>().unwrap();
    members.order_by("id", Direction::Asc);

    let by_score = assert_ok!(members.fetch_by_key("score"));
    assert_eq!(by_score.len(), 3);
    assert_eq!(by_score[&Value::I64(0)].id, 6);
    assert_eq!(by_score[&Value::I64(1)].id, 7);
    assert_eq!(by_score[&Value::I64(2)].id, 5);
}
