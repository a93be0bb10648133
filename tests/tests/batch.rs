//! Multi-record writes are all-or-nothing.

use tests::prelude::*;

use pretty_assertions::assert_eq;

fn setup(test: &mut DbTest) -> Db {
    let db = test.setup_db(models!(User, Book, Profile));
    create_table::<User>(&db);
    db
}

#[test]
fn batch_create_is_one_statement() {
    let mut test = DbTest::new();
    let db = setup(&mut test);

    test.log().clear();

    assert_ok!(db.repo::<User>().unwrap().create_all([
        &mut User::new("1", "alice", 30),
        &mut User::new("2", "bob", 40),
    ]));

    assert_eq!(
        test.log().statements(),
        [r#"INSERT INTO "users" ("id", "name", "age") VALUES (?1, ?2, ?3), (?4, ?5, ?6);"#]
    );
}

#[test]
fn unique_violation_persists_nothing() {
    let mut test = DbTest::new();
    let db = setup(&mut test);
    let users = db.repo::<User>().unwrap();

    let mut alice = User::new("1", "alice", 30);
    let mut bob = User::new("2", "bob", 40);
    let mut dup = User::new("3", "alice", 50);

    let err = assert_err!(users.create_all([&mut alice, &mut bob, &mut dup]));
    assert!(err.is_driver_operation_failed());

    assert_eq!(assert_ok!(users.count()), 0);
    assert!(alice.base().is_fresh());
    assert!(bob.base().is_fresh());
}

#[test]
fn update_all_rolls_back_on_failure() {
    let mut test = DbTest::new();
    let db = setup(&mut test);
    let users = db.repo::<User>().unwrap();

    let mut alice = User::new("1", "alice", 30);
    let mut bob = User::new("2", "bob", 40);
    assert_ok!(users.create_all([&mut alice, &mut bob]));

    alice.age = 99;
    bob.name = "alice".into(); // violates the unique name

    let err = assert_err!(users.update_all([&mut alice, &mut bob]));
    assert!(err.is_driver_operation_failed());
    assert!(test.log().any(|sql| sql == "ROLLBACK"));

    assert_eq!(assert_ok!(users.get("1")).age, 30);
    assert_eq!(assert_ok!(users.get("2")).name, "bob");
}

#[test]
fn update_all_commits_together() {
    let mut test = DbTest::new();
    let db = setup(&mut test);
    let users = db.repo::<User>().unwrap();

    let mut alice = User::new("1", "alice", 30);
    let mut bob = User::new("2", "bob", 40);
    assert_ok!(users.create_all([&mut alice, &mut bob]));

    test.log().clear();

    alice.age = 31;
    bob.age = 41;
    assert_ok!(users.update_all([&mut alice, &mut bob]));

    let statements = test.log().statements();
    assert_eq!(statements.first().map(String::as_str), Some("BEGIN"));
    assert_eq!(statements.last().map(String::as_str), Some("COMMIT"));

    assert_eq!(assert_ok!(users.get("2")).age, 41);
}

#[test]
fn empty_batches_issue_nothing() {
    let mut test = DbTest::new();
    let db = setup(&mut test);
    let users = db.repo::<User>().unwrap();

    test.log().clear();

    assert_ok!(users.create_all(Vec::<&mut User>::new()));
    assert_ok!(users.delete_all(Vec::<&mut User>::new()));
    assert!(test.log().is_empty());
}
