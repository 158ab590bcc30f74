//! Types for the queue consumer.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::admission::GateStatus;

/// Errors returned by the consumer control loop.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsumerError {
    /// `run` was called while the consumer was already running.
    #[error("consumer is already running")]
    AlreadyRunning,
}

/// What happened to a single delivered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Payment succeeded and the message was deleted.
    Acknowledged,
    /// The body could not be decoded; the message was deleted unprocessed.
    Poisoned { kind: &'static str },
    /// Payment failed; the message was left for redelivery.
    ProcessorFailed,
    /// Payment succeeded but the delete call failed; it will be redelivered.
    AckFailed,
}

impl MessageOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageOutcome::Acknowledged => "acknowledged",
            MessageOutcome::Poisoned { .. } => "poisoned",
            MessageOutcome::ProcessorFailed => "processor_failed",
            MessageOutcome::AckFailed => "ack_failed",
        }
    }
}

/// Counters accumulated since the consumer was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerStats {
    pub received: u64,
    pub acknowledged: u64,
    pub poisoned: u64,
    pub processor_failures: u64,
    pub delete_failures: u64,
    pub receive_errors: u64,
}

/// Current status of the consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerStatus {
    /// Name of the message source.
    pub source: String,
    /// Whether the control loop is running.
    pub running: bool,
    /// Whether the consumer is waiting for in-flight work to finish.
    pub draining: bool,
    /// Tasks admitted and not yet finished.
    pub in_flight: usize,
    /// Worker pool gate.
    pub gate: GateStatus,
    /// Lifetime counters.
    pub stats: ConsumerStats,
}

#[derive(Debug, Default)]
pub(crate) struct ConsumerCounters {
    received: AtomicU64,
    acknowledged: AtomicU64,
    poisoned: AtomicU64,
    processor_failures: AtomicU64,
    delete_failures: AtomicU64,
    receive_errors: AtomicU64,
}

impl ConsumerCounters {
    pub(crate) fn add_received(&self, count: usize) {
        self.received.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn add_receive_error(&self) {
        self.receive_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record(&self, outcome: MessageOutcome) {
        let counter = match outcome {
            MessageOutcome::Acknowledged => &self.acknowledged,
            MessageOutcome::Poisoned { .. } => &self.poisoned,
            MessageOutcome::ProcessorFailed => &self.processor_failures,
            MessageOutcome::AckFailed => &self.delete_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ConsumerStats {
        ConsumerStats {
            received: self.received.load(Ordering::Relaxed),
            acknowledged: self.acknowledged.load(Ordering::Relaxed),
            poisoned: self.poisoned.load(Ordering::Relaxed),
            processor_failures: self.processor_failures.load(Ordering::Relaxed),
            delete_failures: self.delete_failures.load(Ordering::Relaxed),
            receive_errors: self.receive_errors.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_record_outcomes() {
        let counters = ConsumerCounters::default();
        counters.add_received(4);
        counters.record(MessageOutcome::Acknowledged);
        counters.record(MessageOutcome::Poisoned { kind: "order_malformed" });
        counters.record(MessageOutcome::ProcessorFailed);
        counters.record(MessageOutcome::AckFailed);
        counters.add_receive_error();

        let stats = counters.snapshot();
        assert_eq!(stats.received, 4);
        assert_eq!(stats.acknowledged, 1);
        assert_eq!(stats.poisoned, 1);
        assert_eq!(stats.processor_failures, 1);
        assert_eq!(stats.delete_failures, 1);
        assert_eq!(stats.receive_errors, 1);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(MessageOutcome::Acknowledged.as_str(), "acknowledged");
        assert_eq!(
            MessageOutcome::Poisoned { kind: "envelope_malformed" }.as_str(),
            "poisoned"
        );
        assert_eq!(MessageOutcome::ProcessorFailed.as_str(), "processor_failed");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ConsumerError::AlreadyRunning.to_string(),
            "consumer is already running"
        );
    }
}
