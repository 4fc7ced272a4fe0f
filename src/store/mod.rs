//! Entity Store: persistence boundary for person, user, author and book
//! documents.
//!
//! [`Store`] is the narrow contract the resolver layer talks to; [`SledStore`]
//! is the embedded implementation backed by one sled tree per entity kind.
//! Unique keys (person name, user username, author name) are enforced here and
//! surface as [`StoreError::Duplicate`].

mod sled_store;

pub use sled_store::SledStore;

use crate::schema::{Author, Book, Person, PersonId, User, UserId};

/// Errors raised by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} validation failed: {field} `{value}` already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("document codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence contract for the four entity kinds.
///
/// `insert_*` fails with [`StoreError::Duplicate`] when a unique key is
/// already taken; `save_*` updates an existing document by id and fails with
/// [`StoreError::NotFound`] when the id is unknown. Single-document lookups
/// return `None` for absence, which is not an error.
pub trait Store: Send + Sync {
    // Persons
    fn insert_person(&self, person: Person) -> Result<Person>;
    fn save_person(&self, person: &Person) -> Result<Person>;
    fn delete_person(&self, id: PersonId) -> Result<()>;
    fn get_person(&self, id: PersonId) -> Result<Option<Person>>;
    fn find_person_by_name(&self, name: &str) -> Result<Option<Person>>;
    fn all_persons(&self) -> Result<Vec<Person>>;
    fn person_count(&self) -> Result<u64>;

    // Users
    fn insert_user(&self, user: User) -> Result<User>;
    fn save_user(&self, user: &User) -> Result<User>;
    fn get_user(&self, id: UserId) -> Result<Option<User>>;
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    /// Reverse lookup for the `friendOf` field: every user whose friends
    /// list mentions the given person.
    fn users_with_friend(&self, person: PersonId) -> Result<Vec<User>>;

    // Authors
    fn insert_author(&self, author: Author) -> Result<Author>;
    fn save_author(&self, author: &Author) -> Result<Author>;
    fn find_author_by_name(&self, name: &str) -> Result<Option<Author>>;
    fn all_authors(&self) -> Result<Vec<Author>>;
    fn author_count(&self) -> Result<u64>;

    // Books
    fn insert_book(&self, book: Book) -> Result<Book>;
    fn find_book_by_title(&self, title: &str) -> Result<Option<Book>>;
    fn all_books(&self) -> Result<Vec<Book>>;
    fn book_count(&self) -> Result<u64>;
}
