//! Mock order publisher for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::order::Order;
use crate::publisher::{OrderPublisher, PublishError};

/// Mock implementation of the OrderPublisher trait.
///
/// Records published orders and can simulate failures or slow publishes.
#[derive(Debug)]
pub struct MockPublisher {
    /// Published orders, in call order.
    published: Arc<RwLock<Vec<Order>>>,
    /// If set, the next publish will fail with this error.
    next_error: Arc<RwLock<Option<PublishError>>>,
    /// Simulated publish latency.
    delay: Arc<RwLock<Duration>>,
}

impl Default for MockPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPublisher {
    /// Create a new mock publisher.
    pub fn new() -> Self {
        Self {
            published: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(Duration::ZERO)),
        }
    }

    /// Get all published orders.
    pub async fn published_orders(&self) -> Vec<Order> {
        self.published.read().await.clone()
    }

    /// Get the number of successful publishes.
    pub async fn publish_count(&self) -> usize {
        self.published.read().await.len()
    }

    /// Configure the next publish to fail with the given error.
    pub async fn set_next_error(&self, error: PublishError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the simulated publish latency.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }
}

#[async_trait]
impl OrderPublisher for MockPublisher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn publish(&self, order: &Order) -> Result<String, PublishError> {
        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let mut published = self.published.write().await;
        published.push(order.clone());
        Ok(format!("mock-msg-{}", published.len()))
    }
}
