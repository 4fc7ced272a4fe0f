//! Phonebook person documents

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a person (ULID-based)
pub type PersonId = Ulid;

/// A phonebook entry. The address is stored flat (street + city); the API
/// layer presents it as a nested `Address` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier (ULID)
    pub id: PersonId,
    /// Display name, unique across all persons
    pub name: String,
    /// Phone number, optional
    pub phone: Option<String>,
    pub street: String,
    pub city: String,
}

impl Person {
    /// Create a new person with a fresh identifier
    pub fn new(
        name: impl Into<String>,
        phone: Option<String>,
        street: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            id: Ulid::new(),
            name: name.into(),
            phone,
            street: street.into(),
            city: city.into(),
        }
    }
}
