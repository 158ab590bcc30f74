//! Mock message source for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::source::{MessageHandle, MessageSource, ReceiveRequest, ReceivedMessage, SourceError};

/// How long an exhausted script waits before returning an empty batch.
const IDLE_DELAY: Duration = Duration::from_millis(10);

/// Mock implementation of the MessageSource trait.
///
/// Provides controllable behavior for testing:
/// - Script receive results (batches or errors) in order
/// - Record every receive call with its timestamp
/// - Record deleted handles
/// - Simulate delete failures
///
/// Once the script is exhausted, `receive` sleeps for the idle delay (capped
/// by the request's wait) and returns an empty batch, like a long poll on an
/// empty queue.
///
/// # Example
///
/// ```rust,ignore
/// let source = MockMessageSource::new();
/// source.push_batch(vec![fixtures::order_message("m-1", &order)]).await;
/// source.push_error(SourceError::Receive("throttled".into())).await;
///
/// // ... run the consumer ...
///
/// assert_eq!(source.delete_count().await, 1);
/// ```
#[derive(Debug)]
pub struct MockMessageSource {
    /// Scripted receive results, consumed front to back.
    script: Arc<RwLock<VecDeque<Result<Vec<ReceivedMessage>, SourceError>>>>,
    /// When each receive call started.
    receive_calls: Arc<RwLock<Vec<Instant>>>,
    /// Handles passed to delete, successful or not.
    deleted: Arc<RwLock<Vec<MessageHandle>>>,
    /// If set, the next delete will fail with this error.
    next_delete_error: Arc<RwLock<Option<SourceError>>>,
}

impl Default for MockMessageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMessageSource {
    /// Create a new mock source with an empty script.
    pub fn new() -> Self {
        Self {
            script: Arc::new(RwLock::new(VecDeque::new())),
            receive_calls: Arc::new(RwLock::new(Vec::new())),
            deleted: Arc::new(RwLock::new(Vec::new())),
            next_delete_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Queue a batch to be returned by a future receive call.
    pub async fn push_batch(&self, messages: Vec<ReceivedMessage>) {
        self.script.write().await.push_back(Ok(messages));
    }

    /// Queue a receive failure.
    pub async fn push_error(&self, error: SourceError) {
        self.script.write().await.push_back(Err(error));
    }

    /// Configure the next delete to fail with the given error.
    pub async fn fail_next_delete(&self, error: SourceError) {
        *self.next_delete_error.write().await = Some(error);
    }

    /// Get the number of receive calls made.
    pub async fn receive_count(&self) -> usize {
        self.receive_calls.read().await.len()
    }

    /// Get the start time of every receive call.
    pub async fn receive_times(&self) -> Vec<Instant> {
        self.receive_calls.read().await.clone()
    }

    /// Get all handles passed to delete.
    pub async fn deleted_handles(&self) -> Vec<MessageHandle> {
        self.deleted.read().await.clone()
    }

    /// Get the number of delete calls made.
    pub async fn delete_count(&self) -> usize {
        self.deleted.read().await.len()
    }
}

#[async_trait]
impl MessageSource for MockMessageSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<ReceivedMessage>, SourceError> {
        self.receive_calls.write().await.push(Instant::now());

        let next = self.script.write().await.pop_front();
        match next {
            Some(Ok(mut messages)) => {
                messages.truncate(request.max_messages);
                Ok(messages)
            }
            Some(Err(e)) => Err(e),
            None => {
                let delay = IDLE_DELAY.min(request.wait);
                tokio::time::sleep(delay).await;
                Ok(Vec::new())
            }
        }
    }

    async fn delete(&self, handle: &MessageHandle) -> Result<(), SourceError> {
        self.deleted.write().await.push(handle.clone());
        match self.next_delete_error.write().await.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
