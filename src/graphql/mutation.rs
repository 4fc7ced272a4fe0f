use async_graphql::{Context, Error, ErrorExtensions, Object, Result, Value};
use serde_json::json;
use std::sync::Arc;

use super::subscription::{EventSender, SubscriptionEvent};
use super::types::{Author, Book, CurrentUser, Person, Token, User};
use crate::auth::{AuthError, AuthService};
use crate::schema as domain;
use crate::store::{SledStore, Store};

pub struct MutationRoot;

/// Protected mutation invoked without a resolved identity.
fn authentication_error() -> Error {
    Error::new("not authenticated").extend_with(|_, ext| ext.set("code", "UNAUTHENTICATED"))
}

/// Constraint violation from the persistence layer. Echoes the offending
/// arguments back to the client as `invalidArgs` extension data.
fn validation_error(source: impl std::fmt::Display, invalid_args: serde_json::Value) -> Error {
    let args = Value::from_json(invalid_args).unwrap_or_default();
    Error::new(source.to_string()).extend_with(|_, ext| {
        ext.set("code", "BAD_USER_INPUT");
        ext.set("invalidArgs", args);
    })
}

/// The authenticated user for this request, or an authentication error.
fn current_user(ctx: &Context<'_>) -> Result<domain::User> {
    ctx.data_opt::<CurrentUser>()
        .and_then(|current| current.0.clone())
        .ok_or_else(authentication_error)
}

#[Object]
impl MutationRoot {
    /// Create a person and befriend it as the current user
    async fn add_person(
        &self,
        ctx: &Context<'_>,
        name: String,
        phone: Option<String>,
        street: String,
        city: String,
    ) -> Result<Person> {
        let store = ctx.data::<Arc<SledStore>>()?;
        let mut user = current_user(ctx)?;

        let invalid_args = json!({
            "name": name.clone(),
            "phone": phone.clone(),
            "street": street.clone(),
            "city": city.clone(),
        });

        let person = domain::Person::new(name, phone, street, city);
        let created = store
            .insert_person(person)
            .map_err(|e| validation_error(e, invalid_args.clone()))?;

        user.add_friend(created.id);
        if let Err(e) = store.save_user(&user) {
            // Compensate for the already-inserted person so the two writes
            // stay consistent even without a store-level transaction.
            let _ = store.delete_person(created.id);
            return Err(validation_error(e, invalid_args));
        }

        if let Ok(sender) = ctx.data::<EventSender>() {
            let _ = sender.send(SubscriptionEvent::PersonAdded(created.clone()));
        }

        Ok(created.into())
    }

    /// Change a person's phone number; null when no person has that name
    async fn edit_number(
        &self,
        ctx: &Context<'_>,
        name: String,
        phone: String,
    ) -> Result<Option<Person>> {
        let store = ctx.data::<Arc<SledStore>>()?;
        current_user(ctx)?;

        let Some(mut person) = store.find_person_by_name(&name)? else {
            return Ok(None);
        };

        person.phone = Some(phone.clone());
        let saved = store
            .save_person(&person)
            .map_err(|e| validation_error(e, json!({ "name": name, "phone": phone })))?;

        Ok(Some(saved.into()))
    }

    /// Register a new user; requires no authentication
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        favorite_genre: Option<String>,
    ) -> Result<User> {
        let store = ctx.data::<Arc<SledStore>>()?;

        let invalid_args = json!({
            "username": username.clone(),
            "favoriteGenre": favorite_genre.clone(),
        });
        let user = domain::User::new(username, favorite_genre);
        let created = store
            .insert_user(user)
            .map_err(|e| validation_error(e, invalid_args))?;

        Ok(created.into())
    }

    /// Verify credentials and issue a session token
    async fn login(&self, ctx: &Context<'_>, username: String, password: String) -> Result<Token> {
        let store = ctx.data::<Arc<SledStore>>()?;
        let auth = ctx.data::<AuthService>()?;

        match auth.login(store.as_ref(), &username, &password) {
            Ok(value) => Ok(Token { value }),
            Err(AuthError::InvalidCredentials) => Err(Error::new("wrong credentials")
                .extend_with(|_, ext| ext.set("code", "BAD_USER_INPUT"))),
            Err(other) => Err(Error::new(other.to_string())),
        }
    }

    /// Add a person to the current user's friends list. Idempotent on
    /// membership; null when no person has that name.
    async fn add_as_friend(&self, ctx: &Context<'_>, name: String) -> Result<Option<User>> {
        let store = ctx.data::<Arc<SledStore>>()?;
        let mut user = current_user(ctx)?;

        let Some(person) = store.find_person_by_name(&name)? else {
            return Ok(None);
        };

        // Re-adding an existing friend changes nothing in the list but the
        // user document is still re-persisted.
        user.add_friend(person.id);
        let saved = store
            .save_user(&user)
            .map_err(|e| validation_error(e, json!({ "name": name })))?;

        Ok(Some(saved.into()))
    }

    /// Catalogue a book, lazily creating its author when absent
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        author: String,
        published: i32,
        genres: Vec<String>,
    ) -> Result<Book> {
        let store = ctx.data::<Arc<SledStore>>()?;
        current_user(ctx)?;

        let invalid_args = json!({
            "title": title.clone(),
            "author": author.clone(),
            "published": published,
            "genres": genres.clone(),
        });

        if store.find_author_by_name(&author)?.is_none() {
            store
                .insert_author(domain::Author::new(author.as_str()))
                .map_err(|e| validation_error(e, invalid_args.clone()))?;
        }

        let book = domain::Book::new(title, published, author, genres);
        let created = store
            .insert_book(book)
            .map_err(|e| validation_error(e, invalid_args))?;

        Ok(created.into())
    }

    /// Set an author's birth year; null when no author has that name
    async fn edit_author(
        &self,
        ctx: &Context<'_>,
        name: String,
        set_born_to: i32,
    ) -> Result<Option<Author>> {
        let store = ctx.data::<Arc<SledStore>>()?;
        current_user(ctx)?;

        let Some(mut author) = store.find_author_by_name(&name)? else {
            return Ok(None);
        };

        author.born = Some(set_born_to);
        let saved = store
            .save_author(&author)
            .map_err(|e| validation_error(e, json!({ "name": name, "setBornTo": set_born_to })))?;

        Ok(Some(saved.into()))
    }
}
