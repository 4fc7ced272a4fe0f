//! GraphQL-facing types wrapping the domain documents.
//!
//! Computed fields live here: `Person.address` synthesizes the nested address
//! object from the flat storage fields, `Person.friendOf` is a reverse lookup
//! over user friend lists, and `Author.bookCount` is a read-time join against
//! the book collection.

use std::sync::Arc;

use async_graphql::{Context, Enum, Object, Result, SimpleObject, ID};

use crate::schema as domain;
use crate::store::{SledStore, Store};

/// The identity-resolved user attached to each request by the context
/// builder. `None` means the request carried no (valid) bearer token.
#[derive(Clone)]
pub struct CurrentUser(pub Option<domain::User>);

/// Phone-presence filter for `allPersons`
#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum YesNo {
    /// Only persons with a phone number
    Yes,
    /// Only persons without a phone number
    No,
}

/// Session token returned by `login`
#[derive(SimpleObject)]
pub struct Token {
    pub value: String,
}

/// Nested address as presented by the API; storage keeps street and city flat
#[derive(SimpleObject)]
pub struct Address {
    pub street: String,
    pub city: String,
}

pub struct Person(pub(crate) domain::Person);

impl From<domain::Person> for Person {
    fn from(person: domain::Person) -> Self {
        Self(person)
    }
}

#[Object]
impl Person {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn phone(&self) -> Option<&str> {
        self.0.phone.as_deref()
    }

    async fn address(&self) -> Address {
        Address {
            street: self.0.street.clone(),
            city: self.0.city.clone(),
        }
    }

    /// Every user whose friends list mentions this person
    async fn friend_of(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let store = ctx.data::<Arc<SledStore>>()?;
        let users = store.users_with_friend(self.0.id)?;
        Ok(users.into_iter().map(User::from).collect())
    }
}

pub struct User(pub(crate) domain::User);

impl From<domain::User> for User {
    fn from(user: domain::User) -> Self {
        Self(user)
    }
}

#[Object]
impl User {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn username(&self) -> &str {
        &self.0.username
    }

    async fn favorite_genre(&self) -> Option<&str> {
        self.0.favorite_genre.as_deref()
    }
}

pub struct Author(pub(crate) domain::Author);

impl From<domain::Author> for Author {
    fn from(author: domain::Author) -> Self {
        Self(author)
    }
}

#[Object]
impl Author {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn born(&self) -> Option<i32> {
        self.0.born
    }

    /// Number of books naming this author, computed at read time
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let store = ctx.data::<Arc<SledStore>>()?;
        let count = store
            .all_books()?
            .iter()
            .filter(|b| b.author == self.0.name)
            .count();
        Ok(count as i32)
    }
}

pub struct Book(pub(crate) domain::Book);

impl From<domain::Book> for Book {
    fn from(book: domain::Book) -> Self {
        Self(book)
    }
}

#[Object]
impl Book {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn published(&self) -> i32 {
        self.0.published
    }

    async fn author(&self) -> &str {
        &self.0.author
    }

    async fn genres(&self) -> &[String] {
        &self.0.genres
    }
}
