//! Wire codec for orders and notification envelopes.
//!
//! Decoding happens in two independent stages:
//!
//! 1. raw message body -> [`Envelope`] -> inner `Message` text
//! 2. inner text -> [`Order`](crate::order::Order)
//!
//! Each stage reports its own [`DecodeError`] variant so the consumer can
//! tell a broken wrapper from a broken order. Malformed input never panics.

mod envelope;

pub use envelope::{decode, decode_envelope, decode_order, encode_envelope, encode_order, Envelope};

use thiserror::Error;

/// Classified decode failure.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The transport wrapper could not be parsed or lacks the `Message` field.
    #[error("malformed envelope: {0}")]
    EnvelopeMalformed(#[source] serde_json::Error),

    /// The inner text is not a valid order.
    #[error("malformed order: {0}")]
    OrderMalformed(#[source] serde_json::Error),
}

impl DecodeError {
    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::EnvelopeMalformed(_) => "envelope_malformed",
            DecodeError::OrderMalformed(_) => "order_malformed",
        }
    }
}
