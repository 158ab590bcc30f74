//! Trait definitions for message sources.

use async_trait::async_trait;

use super::error::SourceError;
use super::types::{MessageHandle, ReceiveRequest, ReceivedMessage};

/// A queue-like source of messages with explicit acknowledgement.
///
/// Implementations must be safe to share between the polling loop and every
/// in-flight worker task.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Returns the name of this source implementation.
    fn name(&self) -> &str;

    /// Receives up to `request.max_messages` messages, waiting up to
    /// `request.wait` if none are visible. An empty batch is not an error.
    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<ReceivedMessage>, SourceError>;

    /// Deletes the delivery identified by `handle`.
    async fn delete(&self, handle: &MessageHandle) -> Result<(), SourceError>;
}
