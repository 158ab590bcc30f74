//! Semaphore-backed admission gate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Errors returned when acquiring a slot.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AdmissionError {
    /// The gate was closed and admits nothing further.
    #[error("admission gate '{0}' is closed")]
    Closed(String),
}

/// Point-in-time view of a gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GateStatus {
    /// Gate name (e.g., "consumer", "payment").
    pub name: String,
    /// Maximum concurrent holders.
    pub capacity: usize,
    /// Permits currently held.
    pub active: usize,
    /// Callers blocked waiting for a permit.
    pub waiting: usize,
    /// Permits handed out since creation.
    pub total_admitted: u64,
}

#[derive(Default)]
struct GateStats {
    active: AtomicU64,
    waiting: AtomicU64,
    total_admitted: AtomicU64,
}

/// Bounded-capacity admission control.
///
/// Cloning is cheap and yields a handle to the same gate.
#[derive(Clone)]
pub struct AdmissionGate {
    name: Arc<str>,
    capacity: usize,
    semaphore: Arc<Semaphore>,
    stats: Arc<GateStats>,
}

impl std::fmt::Debug for AdmissionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionGate")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("available", &self.available())
            .finish()
    }
}

/// A held slot. Dropping it releases the slot.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
    stats: Arc<GateStats>,
}

impl std::fmt::Debug for GateStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateStats")
            .field("active", &self.active.load(Ordering::Relaxed))
            .finish()
    }
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        self.stats.active.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Keeps the waiting counter honest when an acquire future is dropped.
struct WaitingGuard<'a>(&'a AtomicU64);

impl Drop for WaitingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

impl AdmissionGate {
    /// Creates a gate admitting up to `capacity` concurrent holders.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(name: &str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            name: Arc::from(name),
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
            stats: Arc::new(GateStats::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots not currently held.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Waits for a free slot.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Closed`] once [`close`](Self::close) has been called.
    pub async fn acquire(&self) -> Result<AdmissionPermit, AdmissionError> {
        self.stats.waiting.fetch_add(1, Ordering::Relaxed);
        let guard = WaitingGuard(&self.stats.waiting);
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| AdmissionError::Closed(self.name.to_string()))?;
        drop(guard);
        Ok(self.admit(permit))
    }

    /// Takes a slot only if one is free right now.
    pub fn try_acquire(&self) -> Option<AdmissionPermit> {
        Arc::clone(&self.semaphore)
            .try_acquire_owned()
            .ok()
            .map(|permit| self.admit(permit))
    }

    /// Stops admitting. Pending and future acquires fail; held permits stay valid.
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    pub fn status(&self) -> GateStatus {
        GateStatus {
            name: self.name.to_string(),
            capacity: self.capacity,
            active: self.stats.active.load(Ordering::Relaxed) as usize,
            waiting: self.stats.waiting.load(Ordering::Relaxed) as usize,
            total_admitted: self.stats.total_admitted.load(Ordering::Relaxed),
        }
    }

    fn admit(&self, permit: OwnedSemaphorePermit) -> AdmissionPermit {
        self.stats.active.fetch_add(1, Ordering::Relaxed);
        self.stats.total_admitted.fetch_add(1, Ordering::Relaxed);
        AdmissionPermit {
            _permit: permit,
            stats: Arc::clone(&self.stats),
        }
    }
}
