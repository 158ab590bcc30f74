//! In-process fan-out topic.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::{OrderPublisher, PublishError};
use crate::codec::{encode_envelope, encode_order, Envelope};
use crate::metrics;
use crate::order::Order;
use crate::source::InMemoryQueue;

/// A topic delivering every published order to all subscribed queues.
#[derive(Debug)]
pub struct Topic {
    arn: String,
    subscribers: RwLock<Vec<Arc<InMemoryQueue>>>,
}

impl Topic {
    pub fn new(arn: impl Into<String>) -> Self {
        Self {
            arn: arn.into(),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    pub fn arn(&self) -> &str {
        &self.arn
    }

    /// Subscribes a queue to this topic.
    pub fn subscribe(&self, queue: Arc<InMemoryQueue>) {
        debug!(topic = %self.arn, queue = %queue.url(), "Queue subscribed");
        self.subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(queue);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[async_trait]
impl OrderPublisher for Topic {
    fn name(&self) -> &str {
        "topic"
    }

    async fn publish(&self, order: &Order) -> Result<String, PublishError> {
        let message_id = Uuid::new_v4().to_string();
        let envelope = Envelope::wrap(encode_order(order)?, message_id.clone(), &self.arn);
        let body = encode_envelope(&envelope)?;

        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if subscribers.is_empty() {
            return Err(PublishError::NoSubscribers(self.arn.clone()));
        }
        for queue in subscribers.iter() {
            queue.send(body.as_bytes());
        }

        metrics::ORDERS_PUBLISHED.inc();
        Ok(message_id)
    }
}
