//! In-process queue with visibility timeouts and redelivery.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, trace};
use uuid::Uuid;

use super::error::SourceError;
use super::traits::MessageSource;
use super::types::{MessageHandle, ReceiveRequest, ReceivedMessage};

/// Message counts of a queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDepth {
    /// Messages that can be received now.
    pub visible: usize,
    /// Messages delivered and still hidden by their visibility timeout.
    pub in_flight: usize,
}

#[derive(Debug)]
struct StoredMessage {
    id: String,
    body: Vec<u8>,
    receive_count: u32,
    visible_at: Instant,
    receipt: Option<String>,
}

/// A FIFO queue living in process memory.
///
/// Receives long-poll until a message is visible or the wait elapses. Each
/// delivery hides the message for the requested visibility timeout and issues
/// a fresh receipt handle; a message not deleted in time is delivered again
/// with a new handle, and the old one stops working.
#[derive(Debug)]
pub struct InMemoryQueue {
    url: String,
    messages: Mutex<VecDeque<StoredMessage>>,
    notify: Notify,
    closed: AtomicBool,
}

impl InMemoryQueue {
    /// Creates an empty queue addressed by `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            messages: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Enqueues a message body and returns its message id.
    pub fn send(&self, body: impl Into<Vec<u8>>) -> String {
        let id = Uuid::new_v4().to_string();
        self.lock().push_back(StoredMessage {
            id: id.clone(),
            body: body.into(),
            receive_count: 0,
            visible_at: Instant::now(),
            receipt: None,
        });
        trace!(queue = %self.url, message_id = %id, "Message enqueued");
        self.notify.notify_waiters();
        id
    }

    /// Current visible and in-flight counts.
    pub fn depth(&self) -> QueueDepth {
        let now = Instant::now();
        let messages = self.lock();
        let visible = messages.iter().filter(|m| m.visible_at <= now).count();
        QueueDepth {
            visible,
            in_flight: messages.len() - visible,
        }
    }

    /// Closes the queue; pending and future receives fail with [`SourceError::Closed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<StoredMessage>> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Delivers up to `request.max_messages` visible messages, or returns the
    /// instant the next hidden message becomes visible.
    fn take_visible(&self, request: &ReceiveRequest) -> (Vec<ReceivedMessage>, Option<Instant>) {
        let now = Instant::now();
        let mut messages = self.lock();
        let mut batch = Vec::new();
        let mut next_visible: Option<Instant> = None;

        for message in messages.iter_mut() {
            if message.visible_at > now {
                next_visible = Some(match next_visible {
                    Some(at) => at.min(message.visible_at),
                    None => message.visible_at,
                });
                continue;
            }
            if batch.len() >= request.max_messages {
                break;
            }

            let receipt = Uuid::new_v4().to_string();
            message.receipt = Some(receipt.clone());
            message.receive_count += 1;
            message.visible_at = now + request.visibility_timeout;

            batch.push(ReceivedMessage {
                message_id: message.id.clone(),
                handle: MessageHandle::new(receipt),
                body: message.body.clone(),
                receive_count: message.receive_count,
            });
        }

        (batch, next_visible)
    }
}

#[async_trait]
impl MessageSource for InMemoryQueue {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<ReceivedMessage>, SourceError> {
        let deadline = Instant::now() + request.wait;

        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.closed.load(Ordering::SeqCst) {
                return Err(SourceError::Closed);
            }

            let (batch, next_visible) = self.take_visible(request);
            if !batch.is_empty() {
                debug!(queue = %self.url, count = batch.len(), "Delivered messages");
                return Ok(batch);
            }

            if Instant::now() >= deadline {
                return Ok(Vec::new());
            }

            let wake_at = next_visible.map_or(deadline, |at| at.min(deadline));
            tokio::select! {
                _ = &mut notified => {}
                _ = tokio::time::sleep_until(wake_at) => {}
            }
        }
    }

    async fn delete(&self, handle: &MessageHandle) -> Result<(), SourceError> {
        let mut messages = self.lock();
        let position = messages
            .iter()
            .position(|m| m.receipt.as_deref() == Some(handle.as_str()));

        match position {
            Some(idx) => {
                messages.remove(idx);
                Ok(())
            }
            None => Err(SourceError::UnknownHandle(handle.to_string())),
        }
    }
}
