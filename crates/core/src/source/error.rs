//! Error types for message sources.

use thiserror::Error;

/// Errors returned by a [`MessageSource`](super::MessageSource).
///
/// All of these are transient from the consumer's point of view: receive
/// errors are backed off and retried, delete errors are logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The receive call failed (network, throttling, service error).
    #[error("receive failed: {0}")]
    Receive(String),

    /// The delete call failed.
    #[error("delete failed: {0}")]
    Delete(String),

    /// The receipt handle is unknown or belongs to an earlier delivery.
    #[error("unknown or expired receipt handle: {0}")]
    UnknownHandle(String),

    /// The source has been shut down.
    #[error("message source closed")]
    Closed,
}
