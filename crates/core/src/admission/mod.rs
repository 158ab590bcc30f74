//! Admission control for bounded-concurrency work.
//!
//! An [`AdmissionGate`] hands out at most `capacity` [`AdmissionPermit`]s at a
//! time. A permit is released when it is dropped, so every exit path of the
//! holder (success, error, early return, panic unwinding) gives its slot back.
//!
//! The queue consumer uses a gate sized to its worker pool; the synchronous
//! order endpoint uses a separate, never-drained gate for payment calls.

mod gate;

pub use gate::{AdmissionError, AdmissionGate, AdmissionPermit, GateStatus};
