//! Record types shared by the integration tests.

use nexus::{Base, Executor, Model, Nexus, Record, Relations, Result, Value};

#[derive(Debug, Default, Clone, Record)]
pub struct User {
    #[column("id varchar(128) pk")]
    pub id: String,

    #[column("name varchar(128) uk")]
    pub name: String,

    #[column("age int nil")]
    pub age: i64,

    pub base: Base,
}

impl User {
    pub fn new(id: &str, name: &str, age: i64) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            age,
            ..User::default()
        }
    }

    /// Number of books per user, with one grouped count for the batch.
    pub fn count_books(exec: &Executor, users: &[&User]) -> Result<Vec<Value>> {
        let counts = exec
            .repo::<Book>()?
            .filter_in("user_id", users.iter().map(|user| user.id.clone()))
            .count_by("user_id")?;

        Ok(users
            .iter()
            .map(|user| {
                let count = counts.get(&Value::from(&user.id)).copied().unwrap_or(0);
                Value::I64(count as i64)
            })
            .collect())
    }
}

impl Model for User {
    const TABLE: &'static str = "users";

    fn declare(relations: &mut Relations) {
        relations
            .has_many::<Book>("books", Nexus::new().on("id", "user_id"))
            .has_one::<Profile>("profile", Nexus::new().on("id", "user_id"))
            .custom::<User, _>("book_count", User::count_books);
    }
}

#[derive(Debug, Default, Clone, Record)]
pub struct Book {
    #[column("id varchar(128) pk")]
    pub id: String,

    #[column("user_id varchar(128) index")]
    pub user_id: String,

    #[column("name varchar(128)")]
    pub name: String,

    pub base: Base,
}

impl Book {
    pub fn new(id: &str, user_id: &str, name: &str) -> Book {
        Book {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            ..Book::default()
        }
    }
}

impl Model for Book {
    const TABLE: &'static str = "books";

    fn declare(relations: &mut Relations) {
        relations.has_one::<User>("owner", Nexus::new().on("user_id", "id"));
    }
}

#[derive(Debug, Default, Clone, Record)]
pub struct Profile {
    #[column("id int pk")]
    pub id: i64,

    #[column("user_id varchar(128) index")]
    pub user_id: String,

    #[column("bio text nil")]
    pub bio: Option<String>,

    pub base: Base,
}

impl Model for Profile {
    const TABLE: &'static str = "profiles";
}
