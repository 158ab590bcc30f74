//! Bounded-concurrency queue consumer with graceful drain.
//!
//! The [`WorkerPoolConsumer`] runs one control loop that long-polls a
//! [`MessageSource`](crate::source::MessageSource) and hands each delivered
//! message to a worker task:
//!
//! - **Admission**: a worker slot is taken from an
//!   [`AdmissionGate`](crate::admission::AdmissionGate) before the task is
//!   spawned, so at most `concurrency` payments run at once and the loop stops
//!   receiving while the pool is full.
//! - **Per message**: decode envelope -> decode order -> pay -> delete.
//!   Undecodable messages are deleted straight away; failed payments are left
//!   for redelivery.
//! - **Shutdown**: once the cancellation token fires the loop stops receiving
//!   and admitting, then waits for every in-flight task before returning.

mod config;
mod runner;
mod types;

pub use config::ConsumerConfig;
pub use runner::{process_message, WorkerPoolConsumer};
pub use types::{ConsumerError, ConsumerStats, ConsumerStatus, MessageOutcome};
