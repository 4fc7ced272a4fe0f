//! GraphQL API for the phonebook and library catalogue
//!
//! Provides the full schema surface:
//! - [`QueryRoot`]: read operations (counts, lookups, filtered listings, `me`)
//! - [`MutationRoot`]: write operations (persons, users, friends, books)
//! - [`SubscriptionRoot`]: `personAdded` event streaming via WebSocket

mod query;
mod mutation;
mod types;
mod subscription;

pub use query::QueryRoot;
pub use mutation::MutationRoot;
pub use types::*;
pub use subscription::{
    SubscriptionRoot, SubscriptionEvent,
    EventSender, EventReceiver, create_event_channel,
};

use async_graphql::Schema;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::store::SledStore;

/// Schema without subscriptions (simpler setup)
pub type PhonebookSchema = Schema<QueryRoot, MutationRoot, async_graphql::EmptySubscription>;

/// Schema with subscriptions
pub type PhonebookSchemaWithSubs = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Build schema without subscriptions
pub fn build_schema(store: Arc<SledStore>, auth: AuthService) -> PhonebookSchema {
    Schema::build(QueryRoot, MutationRoot, async_graphql::EmptySubscription)
        .data(store)
        .data(auth)
        .finish()
}

/// Build schema with subscriptions
pub fn build_schema_with_subscriptions(
    store: Arc<SledStore>,
    auth: AuthService,
    event_sender: EventSender,
) -> PhonebookSchemaWithSubs {
    Schema::build(QueryRoot, MutationRoot, SubscriptionRoot)
        .data(store)
        .data(auth)
        .data(event_sender)
        .finish()
}
