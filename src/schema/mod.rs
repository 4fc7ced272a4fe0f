//! Domain document types
//!
//! This module defines the persisted data structures:
//! - [`Person`]: phonebook entries with a flat street/city address
//! - [`User`]: accounts holding weak references to befriended persons
//! - [`Author`] and [`Book`]: the library catalogue

mod person;
mod user;
mod library;

pub use person::{Person, PersonId};
pub use user::{User, UserId};
pub use library::{Author, AuthorId, Book, BookId};
