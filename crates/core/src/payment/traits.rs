//! Trait definitions for payment processors.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::order::Order;

/// Errors a payment processor can report.
///
/// The queue consumer never acknowledges a message whose payment failed, so
/// every variant leads to redelivery there.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// The payment was refused.
    #[error("payment declined for order {order_id}: {reason}")]
    Declined { order_id: String, reason: String },

    /// The provider could not be reached or errored.
    #[error("payment provider unavailable: {0}")]
    Unavailable(String),

    /// The processing call exceeded its time budget.
    #[error("payment timed out after {0:?}")]
    TimedOut(Duration),
}

/// Processes the payment for one order.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Returns the name of this processor implementation.
    fn name(&self) -> &str;

    /// Processes the payment. Latency is unbounded from the caller's view.
    async fn process(&self, order: &Order) -> Result<(), PaymentError>;
}
