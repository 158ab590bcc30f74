//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the pipeline's collaborator
//! traits, allowing the consumer and the HTTP receiver to be tested without a
//! real queue, topic or payment provider.
//!
//! # Example
//!
//! ```rust,ignore
//! use orderflow_core::testing::{fixtures, MockMessageSource, MockPaymentProcessor};
//!
//! let source = Arc::new(MockMessageSource::new());
//! let processor = Arc::new(MockPaymentProcessor::new());
//!
//! // Script a delivery
//! source.push_batch(vec![fixtures::order_message("m-1", &fixtures::order("ord-1"))]).await;
//!
//! // Run a WorkerPoolConsumer over them...
//! ```

mod mock_payment;
mod mock_publisher;
mod mock_source;

pub use mock_payment::MockPaymentProcessor;
pub use mock_publisher::MockPublisher;
pub use mock_source::MockMessageSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::codec::{encode_envelope, encode_order, Envelope};
    use crate::notification::{NotificationEvent, NotificationRecord};
    use crate::order::{LineItem, Order};
    use crate::source::{MessageHandle, ReceivedMessage};

    /// Topic ARN used in fixture envelopes.
    pub const TEST_TOPIC_ARN: &str = "arn:aws:sns:us-east-1:000000000000:orders";

    /// Create a pending test order with a single line item.
    pub fn order(order_id: &str) -> Order {
        Order::new(
            order_id,
            42,
            vec![LineItem {
                product_id: "prod-1".to_string(),
                quantity: 2,
                price: 19.99,
            }],
        )
    }

    /// Create `count` test orders with ids `ord-1` to `ord-<count>`.
    pub fn orders(count: usize) -> Vec<Order> {
        (1..=count).map(|i| order(&format!("ord-{}", i))).collect()
    }

    /// Wrap an order in a notification envelope, as the topic delivers it.
    pub fn envelope(order: &Order) -> Envelope {
        let message = encode_order(order).unwrap_or_else(|e| panic!("encode order: {}", e));
        Envelope::wrap(message, format!("env-{}", order.order_id), TEST_TOPIC_ARN)
    }

    /// Raw queue body for an order.
    pub fn order_body(order: &Order) -> Vec<u8> {
        encode_envelope(&envelope(order))
            .unwrap_or_else(|e| panic!("encode envelope: {}", e))
            .into_bytes()
    }

    /// A first delivery of `order`.
    pub fn order_message(message_id: &str, order: &Order) -> ReceivedMessage {
        raw_message(message_id, &order_body(order))
    }

    /// A first delivery of an arbitrary body.
    pub fn raw_message(message_id: &str, body: &[u8]) -> ReceivedMessage {
        ReceivedMessage {
            message_id: message_id.to_string(),
            handle: MessageHandle::new(format!("rh-{}", message_id)),
            body: body.to_vec(),
            receive_count: 1,
        }
    }

    /// Deliveries for each order, with message ids `m-1`, `m-2`, ...
    pub fn order_messages(orders: &[Order]) -> Vec<ReceivedMessage> {
        orders
            .iter()
            .enumerate()
            .map(|(i, order)| order_message(&format!("m-{}", i + 1), order))
            .collect()
    }

    /// A notification event carrying one record per order.
    pub fn notification_event(orders: &[Order]) -> NotificationEvent {
        NotificationEvent {
            records: orders
                .iter()
                .map(|order| NotificationRecord::new(envelope(order)))
                .collect(),
        }
    }
}
