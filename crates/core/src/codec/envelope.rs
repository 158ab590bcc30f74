//! Notification envelope and order (de)serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DecodeError;
use crate::order::Order;

/// Notification wrapper delivered by the topic.
///
/// Only `Message` is required when decoding; the other fields are filled in by
/// the publisher and kept for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "MessageId", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(rename = "TopicArn", default, skip_serializing_if = "Option::is_none")]
    pub topic_arn: Option<String>,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Timestamp", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Envelope {
    /// Wraps `message` in a notification addressed from `topic_arn`.
    pub fn wrap(message: String, message_id: String, topic_arn: &str) -> Self {
        Self {
            kind: Some("Notification".to_string()),
            message_id: Some(message_id),
            topic_arn: Some(topic_arn.to_string()),
            message,
            timestamp: Some(Utc::now()),
        }
    }
}

/// Extracts the inner `Message` text from a raw envelope body.
pub fn decode_envelope(body: &[u8]) -> Result<String, DecodeError> {
    serde_json::from_slice::<Envelope>(body)
        .map(|envelope| envelope.message)
        .map_err(DecodeError::EnvelopeMalformed)
}

/// Parses an order from its JSON text.
pub fn decode_order(text: &str) -> Result<Order, DecodeError> {
    serde_json::from_str(text).map_err(DecodeError::OrderMalformed)
}

/// Runs both decode stages on a raw message body.
pub fn decode(body: &[u8]) -> Result<Order, DecodeError> {
    let inner = decode_envelope(body)?;
    decode_order(&inner)
}

/// Serializes an order to its JSON wire form.
pub fn encode_order(order: &Order) -> Result<String, serde_json::Error> {
    serde_json::to_string(order)
}

/// Serializes an envelope to its JSON wire form.
pub fn encode_envelope(envelope: &Envelope) -> Result<String, serde_json::Error> {
    serde_json::to_string(envelope)
}
