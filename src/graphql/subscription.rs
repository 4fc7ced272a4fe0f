//! Change notifier: publish/subscribe delivery of entity-added events.
//!
//! The bus is an injected `tokio::sync::broadcast` channel created at startup
//! and handed to the schema, never a process global. Delivery is at-most-once
//! and best-effort: a listener not subscribed at publish time misses the
//! event permanently, and lagged receivers drop events rather than buffer.

use async_graphql::{Context, Result, Subscription};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use super::types::Person;
use crate::schema as domain;

/// Events published by the mutation resolvers
#[derive(Debug, Clone)]
pub enum SubscriptionEvent {
    PersonAdded(domain::Person),
}

pub type EventSender = broadcast::Sender<SubscriptionEvent>;
pub type EventReceiver = broadcast::Receiver<SubscriptionEvent>;

/// Create the notification bus with the given buffer capacity
pub fn create_event_channel(capacity: usize) -> (EventSender, EventReceiver) {
    broadcast::channel(capacity)
}

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Emits every person created after the subscription was opened.
    /// The stream ends when the client connection closes.
    async fn person_added(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Person>> {
        let sender = ctx.data::<EventSender>()?;
        let stream = BroadcastStream::new(sender.subscribe()).filter_map(|event| match event {
            Ok(SubscriptionEvent::PersonAdded(person)) => Some(Person::from(person)),
            // Lagged receiver: dropped events are lost, keep streaming.
            Err(_) => None,
        });
        Ok(stream)
    }
}
