//! Payment processing.
//!
//! The pipeline treats payment as an opaque, possibly slow operation behind
//! the [`PaymentProcessor`] trait. [`SimulatedPaymentProcessor`] stands in for
//! a real provider by sleeping for a configured duration.

mod simulated;
mod traits;

pub use simulated::SimulatedPaymentProcessor;
pub use traits::{PaymentError, PaymentProcessor};
