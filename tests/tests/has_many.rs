//! Batched has-many resolution, eager and lazy.

use tests::prelude::*;

use pretty_assertions::assert_eq;

fn setup(test: &mut DbTest) -> Db {
    let db = test.setup_db(models!(User, Book, Profile));
    create_table::<User>(&db);
    create_table::<Book>(&db);
    create_table::<Profile>(&db);
    db
}

#[test]
fn eager_load_binds_books_keyed_by_id() {
    let mut test = DbTest::new();
    let db = setup(&mut test);

    let users = db.repo::<User>().unwrap();
    let books = db.repo::<Book>().unwrap();

    assert_ok!(users.create(&mut User::new("1", "alice", 30)));
    assert_ok!(books.create_all([
        &mut Book::new("b1", "1", "Dune"),
        &mut Book::new("b2", "1", "Emma"),
    ]));

    let user = assert_some!(assert_ok!(db.repo::<User>().unwrap().with("books").find("1")));
    let bound = assert_some!(user.base().many::<Book>("books"));

    assert_eq!(
        bound.keys().cloned().collect::<Vec<_>>(),
        [Value::from("b1"), Value::from("b2")]
    );
    assert_eq!(bound[&Value::from("b2")].name, "Emma");
}

#[test]
fn lazy_many_resolves_on_first_access() {
    let mut test = DbTest::new();
    let db = setup(&mut test);

    let users = db.repo::<User>().unwrap();
    let books = db.repo::<Book>().unwrap();

    assert_ok!(users.create(&mut User::new("1", "alice", 30)));
    assert_ok!(books.create_all([
        &mut Book::new("b1", "1", "Dune"),
        &mut Book::new("b2", "1", "Emma"),
    ]));

    let mut user = assert_ok!(users.get("1"));
    assert!(!user.base().is_loaded("books"));

    test.log().clear();

    let bound = assert_ok!(user.many::<Book>(&db, "books"));
    assert_eq!(bound.len(), 2);
    assert_eq!(test.log().selects_from("books"), 1);

    // Cached on the record afterwards
    assert_ok!(user.many::<Book>(&db, "books"));
    assert_eq!(test.log().selects_from("books"), 1);
}

#[test]
fn one_sub_query_regardless_of_batch_size() {
    let mut test = DbTest::new();
    let db = setup(&mut test);

    let users = db.repo::<User>().unwrap();
    let books = db.repo::<Book>().unwrap();

    for i in 0..5 {
        let id = i.to_string();
        assert_ok!(users.create(&mut User::new(&id, &format!("user-{i}"), i)));
        assert_ok!(books.create_all([
            &mut Book::new(&format!("{i}-a"), &id, "first"),
            &mut Book::new(&format!("{i}-b"), &id, "second"),
        ]));
    }

    test.log().clear();

    let fetched = assert_ok!(db.repo::<User>().unwrap().with("books").fetch());
    assert_eq!(fetched.len(), 5);

    assert_eq!(test.log().selects_from("users"), 1);
    assert_eq!(test.log().selects_from("books"), 1);

    for (key, user) in &fetched {
        let bound = assert_some!(user.base().many::<Book>("books"));
        assert_eq!(bound.len(), 2);
        assert!(bound.values().all(|book| Value::from(&book.user_id) == *key));
    }
}

#[test]
fn owners_without_matches_get_an_empty_collection() {
    let mut test = DbTest::new();
    let db = setup(&mut test);

    let users = db.repo::<User>().unwrap();
    assert_ok!(users.create_all([
        &mut User::new("1", "alice", 30),
        &mut User::new("2", "bob", 40),
    ]));
    assert_ok!(db.repo::<Book>().unwrap().create(&mut Book::new("b1", "1", "Dune")));

    let fetched = assert_ok!(db.repo::<User>().unwrap().with("books").fetch());

    let bob = &fetched[&Value::from("2")];
    assert!(bob.base().is_loaded("books"));
    assert_empty!(assert_some!(bob.base().many::<Book>("books")));
}

#[test]
fn empty_batch_issues_no_sub_query() {
    let mut test = DbTest::new();
    let db = setup(&mut test);

    test.log().clear();

    let fetched = assert_ok!(db.repo::<User>().unwrap().with("books").fetch());
    assert_empty!(fetched);
    assert_eq!(test.log().selects_from("books"), 0);
}

#[test]
fn relationships_follow_the_bound_transaction() {
    let mut test = DbTest::new();
    let db = setup(&mut test);

    let tx = assert_ok!(db.begin());

    let mut users = db.repo::<User>().unwrap();
    users.with_tx(&tx);
    let mut books = db.repo::<Book>().unwrap();
    books.with_tx(&tx);

    assert_ok!(users.create(&mut User::new("1", "alice", 30)));
    assert_ok!(books.create(&mut Book::new("b1", "1", "Dune")));

    // The uncommitted book is visible through the transaction
    let user = assert_some!(assert_ok!(users.with("books").find("1")));
    assert_eq!(assert_some!(user.base().many::<Book>("books")).len(), 1);

    assert_ok!(tx.commit());
}

#[derive(Debug, Default, Record)]
struct Author {
    #[column("id varchar(128) pk")]
    id: String,

    #[column("name varchar(128)")]
    name: String,

    base: Base,
}

impl Author {
    fn new(id: &str, name: &str) -> Author {
        Author {
            id: id.to_string(),
            name: name.to_string(),
            ..Author::default()
        }
    }
}

impl nexus::Model for Author {
    const TABLE: &'static str = "authors";

    fn declare(relations: &mut Relations) {
        relations
            // Only the books titled "Dune"
            .has_many::<Book>(
                "dunes",
                Nexus::new().on("id", "user_id").filter("name", Op::Eq, "Dune"),
            )
            // Books by the author that carry the author's own name
            .has_many::<Book>(
                "namesakes",
                Nexus::new().on("id", "user_id").on("name", "name"),
            );
    }
}

fn setup_authors(test: &mut DbTest) -> Db {
    let db = test.setup_db(models!(Author, Book));
    create_table::<Author>(&db);
    create_table::<Book>(&db);

    assert_ok!(db.repo::<Author>().unwrap().create_all([
        &mut Author::new("a1", "Emma"),
        &mut Author::new("a2", "Dune"),
    ]));
    assert_ok!(db.repo::<Book>().unwrap().create_all([
        &mut Book::new("b1", "a1", "Dune"),
        &mut Book::new("b2", "a1", "Emma"),
        &mut Book::new("b3", "a2", "Emma"),
        &mut Book::new("b4", "a2", "Dune"),
    ]));

    db
}

fn bound_ids(author: &Author, name: &str) -> Vec<String> {
    assert_some!(author.base().many::<Book>(name))
        .values()
        .map(|book| book.id.clone())
        .collect()
}

#[test]
fn predicate_links_narrow_the_related_records() {
    let mut test = DbTest::new();
    let db = setup_authors(&mut test);

    test.log().clear();

    let authors = assert_ok!(db.repo::<Author>().unwrap().with("dunes").fetch());

    assert_eq!(bound_ids(&authors[&Value::from("a1")], "dunes"), ["b1"]);
    assert_eq!(bound_ids(&authors[&Value::from("a2")], "dunes"), ["b4"]);

    assert_eq!(test.log().selects_from("books"), 1);
    assert!(test
        .log()
        .any(|sql| sql.contains(r#"FROM "books""#) && sql.contains(r#""name" = ?"#)));
}

#[test]
fn every_column_link_must_match() {
    let mut test = DbTest::new();
    let db = setup_authors(&mut test);

    test.log().clear();

    let authors = assert_ok!(db.repo::<Author>().unwrap().with("namesakes").fetch());

    assert_eq!(bound_ids(&authors[&Value::from("a1")], "namesakes"), ["b2"]);
    assert_eq!(bound_ids(&authors[&Value::from("a2")], "namesakes"), ["b4"]);

    assert_eq!(test.log().selects_from("books"), 1);
}

#[test]
fn one_sub_query_per_requested_relationship() {
    let mut test = DbTest::new();
    let db = setup_authors(&mut test);

    test.log().clear();

    let authors = assert_ok!(db
        .repo::<Author>()
        .unwrap()
        .with("dunes")
        .with("namesakes")
        .fetch());

    assert_eq!(authors.len(), 2);
    assert_eq!(test.log().selects_from("authors"), 1);
    assert_eq!(test.log().selects_from("books"), 2);

    let a2 = &authors[&Value::from("a2")];
    assert_eq!(bound_ids(a2, "dunes"), ["b4"]);
    assert_eq!(bound_ids(a2, "namesakes"), ["b4"]);
}
