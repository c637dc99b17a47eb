use bson::oid::ObjectId;
use bson::DateTime;
use docrepo::{Datastore, Repository};
use docrepo_derive::Entity;
use serde::{Deserialize, Serialize};

#[ctor::ctor]
fn init_logging() {
    colog::init();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Entity)]
#[entity(collection = "books")]
pub struct Book {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub created_at: DateTime,
    pub title: String,
    pub author: String,
    pub pages: i64,
}

impl Book {
    pub fn new(title: &str, author: &str, pages: i64) -> Self {
        Book {
            id: None,
            created_at: DateTime::now(),
            title: title.to_string(),
            author: author.to_string(),
            pages,
        }
    }
}

/// Entity without a collection override; stored under its type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Entity)]
pub struct Note {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub created_at: DateTime,
    pub text: String,
}

impl Note {
    pub fn new(text: &str) -> Self {
        Note {
            id: None,
            created_at: DateTime::now(),
            text: text.to_string(),
        }
    }
}

/// Entity with renamed identity fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Entity)]
#[entity(collection = "tickets", id = "key", created_at = "opened_at")]
pub struct Ticket {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub key: Option<ObjectId>,
    pub opened_at: DateTime,
    pub subject: String,
}

impl Ticket {
    pub fn new(subject: &str) -> Self {
        Ticket {
            key: None,
            opened_at: DateTime::now(),
            subject: subject.to_string(),
        }
    }
}

pub fn create_datastore() -> Datastore {
    Datastore::in_memory()
}

/// Inserts `count` books titled `book-000`.. with ascending page counts.
pub async fn seed_books(repository: &Repository<Book>, count: usize) -> Vec<ObjectId> {
    use fake::faker::name::en::Name;
    use fake::Fake;

    let books: Vec<Book> = (0..count)
        .map(|index| {
            let author: String = Name().fake();
            Book::new(&format!("book-{:03}", index), &author, 100 + index as i64)
        })
        .collect();
    repository.insert_many(&books).await.expect("seeding books")
}
