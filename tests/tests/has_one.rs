use tests::prelude::*;

use pretty_assertions::assert_eq;

fn setup(test: &mut DbTest) -> Db {
    let db = test.setup_db(models!(User, Book, Profile));
    create_table::<User>(&db);
    create_table::<Book>(&db);
    create_table::<Profile>(&db);
    db
}

fn profile(id: i64, user_id: &str, bio: &str) -> Profile {
    Profile {
        id,
        user_id: user_id.to_string(),
        bio: Some(bio.to_string()),
        ..Profile::default()
    }
}

#[test]
fn binds_the_single_match() {
    let mut test = DbTest::new();
    let db = setup(&mut test);

    assert_ok!(db
        .repo::<User>()
        .unwrap()
        .create_all([&mut User::new("1", "alice", 30), &mut User::new("2", "bob", 40)]));
    assert_ok!(db.repo::<Profile>().unwrap().create(&mut profile(10, "1", "hello")));

    let fetched = assert_ok!(db.repo::<User>().unwrap().with("profile").fetch());

    let alice = assert_some!(fetched[&Value::from("1")].base().one::<Profile>("profile"));
    assert_eq!(assert_some!(alice).bio.as_deref(), Some("hello"));

    // Loaded, but nothing matched
    let bob = assert_some!(fetched[&Value::from("2")].base().one::<Profile>("profile"));
    assert_none!(bob);
}

#[test]
fn first_match_by_primary_key_wins() {
    let mut test = DbTest::new();
    let db = setup(&mut test);

    assert_ok!(db.repo::<User>().unwrap().create(&mut User::new("1", "alice", 30)));
    assert_ok!(db
        .repo::<Profile>()
        .unwrap()
        .create_all([&mut profile(7, "1", "second"), &mut profile(3, "1", "first")]));

    let mut user = assert_ok!(db.repo::<User>().unwrap().get("1"));
    let bound = assert_some!(assert_ok!(user.one::<Profile>(&db, "profile")));

    assert_eq!(bound.id, 3);
}

#[test]
fn cyclic_declarations_resolve_one_level() {
    let mut test = DbTest::new();
    let db = setup(&mut test);

    assert_ok!(db
        .repo::<User>()
        .unwrap()
        .create_all([&mut User::new("1", "alice", 30), &mut User::new("2", "bob", 40)]));
    assert_ok!(db.repo::<Book>().unwrap().create_all([
        &mut Book::new("b1", "1", "Dune"),
        &mut Book::new("b2", "2", "Emma"),
        &mut Book::new("b3", "1", "Ulysses"),
    ]));

    test.log().clear();

    let books = assert_ok!(db
        .repo::<Book>()
        .unwrap()
        .with("owner")
        .order_by("id", Direction::Asc)
        .all());
    assert_eq!(test.log().selects_from("users"), 1);

    let owners: Vec<_> = books
        .iter()
        .map(|book| assert_some!(assert_some!(book.base().one::<User>("owner"))).name.clone())
        .collect();
    assert_eq!(owners, ["alice", "bob", "alice"]);

    // The owners themselves carry no resolved relationships
    let owner = assert_some!(assert_some!(books[0].base().one::<User>("owner")));
    assert!(!owner.base().is_loaded("books"));
}

#[test]
fn null_keys_match_nothing() {
    #[derive(Debug, Default, Record)]
    struct Comment {
        #[column("id int pk")]
        id: i64,

        #[column("reply_to int nil")]
        reply_to: Option<i64>,

        base: Base,
    }

    impl nexus::Model for Comment {
        const TABLE: &'static str = "comments";

        fn declare(relations: &mut Relations) {
            relations.has_one::<Comment>("parent", Nexus::new().on("reply_to", "id"));
        }
    }

    let mut test = DbTest::new();
    let db = test.setup_db(models!(Comment));
    create_table::<Comment>(&db);

    let comments = db.repo::<Comment>().unwrap();
    assert_ok!(comments.create_all([
        &mut Comment {
            id: 1,
            ..Comment::default()
        },
        &mut Comment {
            id: 2,
            reply_to: Some(1),
            ..Comment::default()
        },
    ]));

    let fetched = assert_ok!(db.repo::<Comment>().unwrap().with("parent").fetch());

    assert_none!(assert_some!(fetched[&Value::from(1)].base().one::<Comment>("parent")));
    let parent = assert_some!(assert_some!(
        fetched[&Value::from(2)].base().one::<Comment>("parent")
    ));
    assert_eq!(parent.id, 1);
}
