use async_graphql::{Context, Object, Result};
use std::sync::Arc;

use super::types::{Author, Book, CurrentUser, Person, User, YesNo};
use crate::store::{SledStore, Store};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn person_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let store = ctx.data::<Arc<SledStore>>()?;
        Ok(store.person_count()? as i32)
    }

    /// All persons, optionally filtered by phone-number presence
    async fn all_persons(&self, ctx: &Context<'_>, phone: Option<YesNo>) -> Result<Vec<Person>> {
        let store = ctx.data::<Arc<SledStore>>()?;
        let persons = store.all_persons()?;
        let persons = match phone {
            None => persons,
            Some(YesNo::Yes) => persons.into_iter().filter(|p| p.phone.is_some()).collect(),
            Some(YesNo::No) => persons.into_iter().filter(|p| p.phone.is_none()).collect(),
        };
        Ok(persons.into_iter().map(Person::from).collect())
    }

    async fn find_person(&self, ctx: &Context<'_>, name: String) -> Result<Option<Person>> {
        let store = ctx.data::<Arc<SledStore>>()?;
        Ok(store.find_person_by_name(&name)?.map(Person::from))
    }

    async fn author_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let store = ctx.data::<Arc<SledStore>>()?;
        Ok(store.author_count()? as i32)
    }

    async fn all_authors(&self, ctx: &Context<'_>) -> Result<Vec<Author>> {
        let store = ctx.data::<Arc<SledStore>>()?;
        Ok(store.all_authors()?.into_iter().map(Author::from).collect())
    }

    async fn find_author(&self, ctx: &Context<'_>, name: String) -> Result<Option<Author>> {
        let store = ctx.data::<Arc<SledStore>>()?;
        Ok(store.find_author_by_name(&name)?.map(Author::from))
    }

    async fn book_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let store = ctx.data::<Arc<SledStore>>()?;
        Ok(store.book_count()? as i32)
    }

    /// All books, filterable by author, genre membership, or both
    /// (intersection)
    async fn all_books(
        &self,
        ctx: &Context<'_>,
        author: Option<String>,
        genre: Option<String>,
    ) -> Result<Vec<Book>> {
        let store = ctx.data::<Arc<SledStore>>()?;
        let mut books = store.all_books()?;
        if let Some(author) = &author {
            books.retain(|b| &b.author == author);
        }
        if let Some(genre) = &genre {
            books.retain(|b| b.genres.iter().any(|g| g == genre));
        }
        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn find_book(&self, ctx: &Context<'_>, title: String) -> Result<Option<Book>> {
        let store = ctx.data::<Arc<SledStore>>()?;
        Ok(store.find_book_by_title(&title)?.map(Book::from))
    }

    /// The authenticated user, or null when the request carried no identity
    async fn me(&self, ctx: &Context<'_>) -> Option<User> {
        ctx.data_opt::<CurrentUser>()
            .and_then(|current| current.0.clone())
            .map(User::from)
    }
}
