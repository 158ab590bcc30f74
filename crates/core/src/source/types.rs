//! Types shared by message source implementations.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Receipt for one delivery of a message.
///
/// Redeliveries of the same message carry different handles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageHandle(String);

impl MessageHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameters of a single receive call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveRequest {
    /// Maximum messages to return.
    pub max_messages: usize,
    /// Long-poll wait when nothing is visible.
    pub wait: Duration,
    /// How long delivered messages stay hidden from other receivers.
    pub visibility_timeout: Duration,
}

impl Default for ReceiveRequest {
    fn default() -> Self {
        Self {
            max_messages: 10,
            wait: Duration::from_secs(20),
            visibility_timeout: Duration::from_secs(60),
        }
    }
}

/// A delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    /// Stable id of the underlying message.
    pub message_id: String,
    /// Receipt for this delivery.
    pub handle: MessageHandle,
    /// Raw body (normally a notification envelope).
    pub body: Vec<u8>,
    /// How many times this message has been delivered, this one included.
    pub receive_count: u32,
}

impl ReceivedMessage {
    /// Body as text, lossily decoded, for logging.
    pub fn body_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
