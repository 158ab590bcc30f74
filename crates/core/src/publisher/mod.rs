//! Order publishing for the asynchronous submission path.
//!
//! [`Topic`] is an in-process fan-out topic: it wraps each order in a
//! notification [`Envelope`](crate::codec::Envelope) and sends it to every
//! subscribed [`InMemoryQueue`](crate::source::InMemoryQueue).

mod topic;

pub use topic::Topic;

use async_trait::async_trait;
use thiserror::Error;

use crate::order::Order;

/// Errors raised while publishing an order.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The order could not be serialized.
    #[error("failed to encode order: {0}")]
    Encode(#[from] serde_json::Error),

    /// The topic has no subscribers, so the order would be lost.
    #[error("topic {0} has no subscribers")]
    NoSubscribers(String),

    /// The publish call did not complete in time.
    #[error("publish timed out")]
    TimedOut,

    /// Any other transport failure.
    #[error("publish failed: {0}")]
    Transport(String),
}

/// Publishes orders for asynchronous processing.
#[async_trait]
pub trait OrderPublisher: Send + Sync {
    /// Returns the name of this publisher implementation.
    fn name(&self) -> &str;

    /// Publishes `order` and returns the assigned message id.
    async fn publish(&self, order: &Order) -> Result<String, PublishError>;
}
