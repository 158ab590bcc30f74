//! Notification event types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{DecodeError, Envelope};
use crate::payment::PaymentError;

/// Errors that fail a notification batch.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// A record's message was not a valid order.
    #[error("record {message_id} is malformed: {source}")]
    Malformed {
        message_id: String,
        #[source]
        source: DecodeError,
    },

    /// Payment failed for an order in the batch.
    #[error("payment failed for order {order_id}: {source}")]
    Payment {
        order_id: String,
        #[source]
        source: PaymentError,
    },
}

/// A batch of notification records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<NotificationRecord>,
}

/// One record of a notification batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    #[serde(rename = "EventSource", default, skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    #[serde(rename = "Sns")]
    pub notification: Envelope,
}

impl NotificationRecord {
    pub fn new(notification: Envelope) -> Self {
        Self {
            event_source: Some("aws:sns".to_string()),
            notification,
        }
    }

    /// Message id of the notification, or `"unknown"`.
    pub fn message_id(&self) -> &str {
        self.notification
            .message_id
            .as_deref()
            .unwrap_or("unknown")
    }
}
