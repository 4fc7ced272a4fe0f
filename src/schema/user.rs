//! User account documents

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use super::PersonId;

/// Unique identifier for a user (ULID-based)
pub type UserId = Ulid;

/// An account that can authenticate and befriend persons.
///
/// `friends` holds weak references (identifiers, not owned copies): deleting
/// a person does not cascade into the lists that mention it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (ULID)
    pub id: UserId,
    /// Login name, unique across all users
    pub username: String,
    pub favorite_genre: Option<String>,
    /// Identifiers of befriended persons, no duplicates
    pub friends: Vec<PersonId>,
}

impl User {
    /// Create a new user with a fresh identifier and an empty friends list
    pub fn new(username: impl Into<String>, favorite_genre: Option<String>) -> Self {
        Self {
            id: Ulid::new(),
            username: username.into(),
            favorite_genre,
            friends: Vec::new(),
        }
    }

    pub fn is_friend(&self, person: PersonId) -> bool {
        self.friends.contains(&person)
    }

    /// Append a person to the friends list unless already present.
    /// Returns whether the list changed.
    pub fn add_friend(&mut self, person: PersonId) -> bool {
        if self.is_friend(person) {
            return false;
        }
        self.friends.push(person);
        true
    }
}
