//! Library catalogue documents: authors and books

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for an author (ULID-based)
pub type AuthorId = Ulid;

/// Unique identifier for a book (ULID-based)
pub type BookId = Ulid;

/// A book author. `bookCount` is never stored; the API layer computes it at
/// read time by counting books whose author field matches the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    /// Author name, unique across all authors
    pub name: String,
    /// Birth year, optional
    pub born: Option<i32>,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Ulid::new(),
            name: name.into(),
            born: None,
        }
    }
}

/// A catalogued book.
///
/// `author` is a free-text name, not a reference id. An [`Author`] record is
/// lazily created the first time a book names one that does not exist yet;
/// referential integrity is otherwise not enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub published: i32,
    pub author: String,
    pub genres: Vec<String>,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        published: i32,
        author: impl Into<String>,
        genres: Vec<String>,
    ) -> Self {
        Self {
            id: Ulid::new(),
            title: title.into(),
            published,
            author: author.into(),
            genres,
        }
    }
}
