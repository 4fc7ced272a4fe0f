//! Embedded sled-backed implementation of the [`Store`] contract.
//!
//! Layout: one tree per entity kind keyed by the document's ULID string,
//! values are JSON-serialized documents. Unique keys get their own index
//! trees mapping key string to document id.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use ulid::Ulid;

use super::{Result, Store, StoreError};
use crate::schema::{Author, Book, Person, PersonId, User, UserId};

pub struct SledStore {
    persons: sled::Tree,
    persons_by_name: sled::Tree,
    users: sled::Tree,
    users_by_username: sled::Tree,
    authors: sled::Tree,
    authors_by_name: sled::Tree,
    books: sled::Tree,
    // Owns the underlying sled::Db; flushed on drop.
    _db: sled::Db,
}

impl SledStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self {
            persons: db.open_tree("persons")?,
            persons_by_name: db.open_tree("persons_by_name")?,
            users: db.open_tree("users")?,
            users_by_username: db.open_tree("users_by_username")?,
            authors: db.open_tree("authors")?,
            authors_by_name: db.open_tree("authors_by_name")?,
            books: db.open_tree("books")?,
            _db: db,
        })
    }

    fn put<T: Serialize>(tree: &sled::Tree, id: &Ulid, doc: &T) -> Result<()> {
        let bytes = serde_json::to_vec(doc)?;
        tree.insert(id.to_string().as_bytes(), bytes)?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(tree: &sled::Tree, id: &Ulid) -> Result<Option<T>> {
        match tree.get(id.to_string().as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(tree: &sled::Tree) -> Result<Vec<T>> {
        let mut out = Vec::new();
        for entry in tree.iter() {
            let (_, bytes) = entry?;
            out.push(serde_json::from_slice(&bytes)?);
        }
        Ok(out)
    }

    fn lookup_indexed<T: DeserializeOwned>(
        index: &sled::Tree,
        tree: &sled::Tree,
        key: &str,
    ) -> Result<Option<T>> {
        match index.get(key.as_bytes())? {
            Some(id_bytes) => match tree.get(&id_bytes)? {
                Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    /// Claim a unique key in an index tree, failing when it is already held
    /// by a different document.
    fn claim_key(
        index: &sled::Tree,
        key: &str,
        id: &Ulid,
        entity: &'static str,
        field: &'static str,
    ) -> Result<()> {
        let id_str = id.to_string();
        if let Some(existing) = index.get(key.as_bytes())? {
            if existing.as_ref() != id_str.as_bytes() {
                return Err(StoreError::Duplicate {
                    entity,
                    field,
                    value: key.to_string(),
                });
            }
        }
        index.insert(key.as_bytes(), id_str.as_bytes())?;
        Ok(())
    }
}

impl Store for SledStore {
    fn insert_person(&self, person: Person) -> Result<Person> {
        Self::claim_key(&self.persons_by_name, &person.name, &person.id, "Person", "name")?;
        Self::put(&self.persons, &person.id, &person)?;
        Ok(person)
    }

    fn save_person(&self, person: &Person) -> Result<Person> {
        let existing: Person = Self::get(&self.persons, &person.id)?
            .ok_or(StoreError::NotFound { entity: "Person" })?;
        if existing.name != person.name {
            Self::claim_key(&self.persons_by_name, &person.name, &person.id, "Person", "name")?;
            self.persons_by_name.remove(existing.name.as_bytes())?;
        }
        Self::put(&self.persons, &person.id, person)?;
        Ok(person.clone())
    }

    fn delete_person(&self, id: PersonId) -> Result<()> {
        if let Some(person) = Self::get::<Person>(&self.persons, &id)? {
            self.persons_by_name.remove(person.name.as_bytes())?;
            self.persons.remove(id.to_string().as_bytes())?;
        }
        Ok(())
    }

    fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
        Self::get(&self.persons, &id)
    }

    fn find_person_by_name(&self, name: &str) -> Result<Option<Person>> {
        Self::lookup_indexed(&self.persons_by_name, &self.persons, name)
    }

    fn all_persons(&self) -> Result<Vec<Person>> {
        Self::scan(&self.persons)
    }

    fn person_count(&self) -> Result<u64> {
        Ok(self.persons.len() as u64)
    }

    fn insert_user(&self, user: User) -> Result<User> {
        Self::claim_key(&self.users_by_username, &user.username, &user.id, "User", "username")?;
        Self::put(&self.users, &user.id, &user)?;
        Ok(user)
    }

    fn save_user(&self, user: &User) -> Result<User> {
        let existing: User = Self::get(&self.users, &user.id)?
            .ok_or(StoreError::NotFound { entity: "User" })?;
        if existing.username != user.username {
            Self::claim_key(&self.users_by_username, &user.username, &user.id, "User", "username")?;
            self.users_by_username.remove(existing.username.as_bytes())?;
        }
        Self::put(&self.users, &user.id, user)?;
        Ok(user.clone())
    }

    fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Self::get(&self.users, &id)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Self::lookup_indexed(&self.users_by_username, &self.users, username)
    }

    fn users_with_friend(&self, person: PersonId) -> Result<Vec<User>> {
        let users: Vec<User> = Self::scan(&self.users)?;
        Ok(users.into_iter().filter(|u| u.is_friend(person)).collect())
    }

    fn insert_author(&self, author: Author) -> Result<Author> {
        Self::claim_key(&self.authors_by_name, &author.name, &author.id, "Author", "name")?;
        Self::put(&self.authors, &author.id, &author)?;
        Ok(author)
    }

    fn save_author(&self, author: &Author) -> Result<Author> {
        let existing: Author = Self::get(&self.authors, &author.id)?
            .ok_or(StoreError::NotFound { entity: "Author" })?;
        if existing.name != author.name {
            Self::claim_key(&self.authors_by_name, &author.name, &author.id, "Author", "name")?;
            self.authors_by_name.remove(existing.name.as_bytes())?;
        }
        Self::put(&self.authors, &author.id, author)?;
        Ok(author.clone())
    }

    fn find_author_by_name(&self, name: &str) -> Result<Option<Author>> {
        Self::lookup_indexed(&self.authors_by_name, &self.authors, name)
    }

    fn all_authors(&self) -> Result<Vec<Author>> {
        Self::scan(&self.authors)
    }

    fn author_count(&self) -> Result<u64> {
        Ok(self.authors.len() as u64)
    }

    fn insert_book(&self, book: Book) -> Result<Book> {
        // Titles are not a unique key; lookups by title return the first match.
        Self::put(&self.books, &book.id, &book)?;
        Ok(book)
    }

    fn find_book_by_title(&self, title: &str) -> Result<Option<Book>> {
        let books: Vec<Book> = Self::scan(&self.books)?;
        Ok(books.into_iter().find(|b| b.title == title))
    }

    fn all_books(&self) -> Result<Vec<Book>> {
        Self::scan(&self.books)
    }

    fn book_count(&self) -> Result<u64> {
        Ok(self.books.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (SledStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(dir.path().join("db")).unwrap();
        (store, dir)
    }

    #[test]
    fn person_roundtrip_and_name_lookup() {
        let (store, _dir) = temp_store();
        let person = store
            .insert_person(Person::new("Ada", Some("040-1234".into()), "Main St", "Helsinki"))
            .unwrap();

        let found = store.find_person_by_name("Ada").unwrap().unwrap();
        assert_eq!(found.id, person.id);
        assert_eq!(found.city, "Helsinki");
        assert_eq!(store.person_count().unwrap(), 1);
        assert!(store.find_person_by_name("Bob").unwrap().is_none());
    }

    #[test]
    fn duplicate_person_name_rejected() {
        let (store, _dir) = temp_store();
        store
            .insert_person(Person::new("Ada", None, "Main St", "Helsinki"))
            .unwrap();
        let err = store
            .insert_person(Person::new("Ada", None, "Other St", "Espoo"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "name", .. }));
        assert_eq!(store.person_count().unwrap(), 1);
    }

    #[test]
    fn save_person_updates_in_place() {
        let (store, _dir) = temp_store();
        let mut person = store
            .insert_person(Person::new("Ada", None, "Main St", "Helsinki"))
            .unwrap();
        person.phone = Some("050-9999".into());
        store.save_person(&person).unwrap();

        let found = store.find_person_by_name("Ada").unwrap().unwrap();
        assert_eq!(found.phone.as_deref(), Some("050-9999"));
        assert_eq!(store.person_count().unwrap(), 1);
    }

    #[test]
    fn save_unknown_person_is_not_found() {
        let (store, _dir) = temp_store();
        let ghost = Person::new("Ghost", None, "Nowhere", "Nowhere");
        let err = store.save_person(&ghost).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "Person" }));
    }

    #[test]
    fn delete_person_frees_the_name() {
        let (store, _dir) = temp_store();
        let person = store
            .insert_person(Person::new("Ada", None, "Main St", "Helsinki"))
            .unwrap();
        store.delete_person(person.id).unwrap();

        assert!(store.find_person_by_name("Ada").unwrap().is_none());
        store
            .insert_person(Person::new("Ada", None, "New St", "Espoo"))
            .unwrap();
    }

    #[test]
    fn users_with_friend_reverse_lookup() {
        let (store, _dir) = temp_store();
        let person = store
            .insert_person(Person::new("Ada", None, "Main St", "Helsinki"))
            .unwrap();
        let mut alice = store.insert_user(User::new("alice", None)).unwrap();
        store.insert_user(User::new("bob", None)).unwrap();

        alice.add_friend(person.id);
        store.save_user(&alice).unwrap();

        let friends_of = store.users_with_friend(person.id).unwrap();
        assert_eq!(friends_of.len(), 1);
        assert_eq!(friends_of[0].username, "alice");
    }

    #[test]
    fn duplicate_username_rejected() {
        let (store, _dir) = temp_store();
        store.insert_user(User::new("alice", None)).unwrap();
        let err = store.insert_user(User::new("alice", None)).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "username", .. }));
    }

    #[test]
    fn book_title_lookup_without_unique_index() {
        let (store, _dir) = temp_store();
        store
            .insert_book(Book::new("Dune", 1965, "Frank Herbert", vec!["scifi".into()]))
            .unwrap();
        assert!(store.find_book_by_title("Dune").unwrap().is_some());
        assert!(store.find_book_by_title("Nope").unwrap().is_none());
        assert_eq!(store.book_count().unwrap(), 1);
    }
}
