//! GraphQL phonebook and library catalogue over an embedded document store.
//!
//! The crate is resolver glue between two collaborators: `async-graphql`
//! executes the schema and `sled` persists the documents. On top of that sit
//! a token-based auth service ([`AuthService`]), a per-request context builder
//! ([`server::resolve_current_user`]) and a broadcast-based change notifier
//! for the `personAdded` subscription.

pub mod auth;
pub mod config;
pub mod graphql;
pub mod schema;
pub mod server;
pub mod store;

pub use auth::{AuthError, AuthService, Identity};
pub use config::AuthConfig;
pub use graphql::{
    build_schema, build_schema_with_subscriptions, create_event_channel, EventSender,
    PhonebookSchema, PhonebookSchemaWithSubs,
};
pub use schema::{Author, Book, Person, PersonId, User, UserId};
pub use store::{SledStore, Store, StoreError};
