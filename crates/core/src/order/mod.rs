//! Order domain types.
//!
//! An [`Order`] is the entity that flows from the receiver, through the topic
//! and queue, into the payment processor. Status only moves forward:
//! `pending -> processing -> completed`.

mod types;

pub use types::{LineItem, Order, OrderError, OrderStatus, OrderSubmission};
