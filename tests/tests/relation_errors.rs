use tests::prelude::*;

use nexus::Model;

fn setup(test: &mut DbTest) -> Db {
    let db = test.setup_db(models!(User, Book, Profile));
    create_table::<User>(&db);
    create_table::<Book>(&db);
    db
}

#[test]
fn undeclared_relationship_fails_eager_load() {
    let mut test = DbTest::new();
    let db = setup(&mut test);

    let mut users = db.repo::<User>().unwrap();
    assert_ok!(users.create(&mut User::new("1", "alice", 30)));

    test.log().clear();

    let err = assert_err!(users.with("nope").all());
    assert!(err.is_relation_not_declared());
    assert!(err.to_string().contains("`nope` on `users`"));

    // Nothing is fetched for the related side
    assert_eq!(test.log().selects_from("books"), 0);
}

#[test]
fn undeclared_relationship_fails_lazy_load() {
    let mut test = DbTest::new();
    let db = setup(&mut test);

    let mut alice = User::new("1", "alice", 30);
    let err = assert_err!(alice.many::<Book>(&db, "reviews"));
    assert!(err.is_relation_not_declared());
    assert!(!alice.base().is_loaded("reviews"));
}

#[test]
fn one_and_many_are_not_interchangeable() {
    let mut test = DbTest::new();
    let db = setup(&mut test);

    let mut alice = User::new("1", "alice", 30);
    assert_err!(alice.one::<Book>(&db, "books"));
}

#[derive(Debug, Default, Record)]
struct Orphan {
    #[column("id int pk")]
    id: i64,

    base: Base,
}

impl Model for Orphan {
    const TABLE: &'static str = "orphans";

    fn declare(relations: &mut Relations) {
        relations.has_many::<Book>("books", Nexus::new().on("owner_id", "user_id"));
    }
}

#[derive(Debug, Default, Record)]
struct Misdirected {
    #[column("id int pk")]
    id: i64,

    base: Base,
}

impl Model for Misdirected {
    const TABLE: &'static str = "misdirected";

    fn declare(relations: &mut Relations) {
        relations.has_many::<Book>("books", Nexus::new().on("id", "author_id"));
    }
}

#[test]
fn unknown_owner_column_is_rejected_at_build() {
    let err = assert_err!(models!(Orphan).connect("sqlite::memory:"));
    assert!(err.is_field_not_defined());
    assert!(err.to_string().contains("owner_id"));
}

#[test]
fn unknown_related_column_is_rejected_at_build() {
    let err = assert_err!(models!(Misdirected).connect("sqlite::memory:"));
    assert!(err.is_field_not_defined());
    assert!(err.to_string().contains("author_id"));
}
