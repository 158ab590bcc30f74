//! Mock payment processor for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};

use crate::order::Order;
use crate::payment::{PaymentError, PaymentProcessor};

/// Mock implementation of the PaymentProcessor trait.
///
/// Provides controllable behavior for testing:
/// - Record processed orders
/// - Track current and peak concurrency
/// - Simulate failures (one-shot or persistent)
/// - Hold payments until released, to keep tasks in flight
///
/// # Example
///
/// ```rust,ignore
/// let processor = MockPaymentProcessor::with_duration(Duration::from_millis(50));
///
/// // ... run the consumer ...
///
/// assert!(processor.max_concurrency() <= 10);
/// assert_eq!(processor.completed_count(), 15);
/// ```
#[derive(Debug)]
pub struct MockPaymentProcessor {
    /// Orders passed to process, in call order.
    processed: Arc<RwLock<Vec<Order>>>,
    /// Simulated processing duration.
    duration: Arc<RwLock<Duration>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<PaymentError>>>,
    /// If set, every call fails with this error.
    persistent_error: Arc<RwLock<Option<PaymentError>>>,
    /// While true, calls wait before finishing.
    held: watch::Sender<bool>,
    invocations: AtomicUsize,
    completed: AtomicUsize,
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Default for MockPaymentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPaymentProcessor {
    /// Create a new mock processor that succeeds after 10ms.
    pub fn new() -> Self {
        Self::with_duration(Duration::from_millis(10))
    }

    /// Create a new mock processor with the given processing duration.
    pub fn with_duration(duration: Duration) -> Self {
        let (held, _) = watch::channel(false);
        Self {
            processed: Arc::new(RwLock::new(Vec::new())),
            duration: Arc::new(RwLock::new(duration)),
            next_error: Arc::new(RwLock::new(None)),
            persistent_error: Arc::new(RwLock::new(None)),
            held,
            invocations: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Set the simulated processing duration.
    pub async fn set_duration(&self, duration: Duration) {
        *self.duration.write().await = duration;
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: PaymentError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make every call fail with the given error, or clear it with `None`.
    pub async fn set_persistent_error(&self, error: Option<PaymentError>) {
        *self.persistent_error.write().await = error;
    }

    /// Make calls wait until [`release`](Self::release) is called.
    pub fn hold(&self) {
        self.held.send_replace(true);
    }

    /// Let held calls finish.
    pub fn release(&self) {
        self.held.send_replace(false);
    }

    /// Get all orders passed to process.
    pub async fn processed_orders(&self) -> Vec<Order> {
        self.processed.read().await.clone()
    }

    /// Number of process calls started.
    pub fn invocation_count(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Number of process calls finished, successful or not.
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Calls currently running.
    pub fn current_concurrency(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed running at once.
    pub fn max_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` calls are running at once.
    pub async fn wait_for_in_flight(&self, count: usize) {
        while self.current_concurrency() < count {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }
}

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn process(&self, order: &Order) -> Result<(), PaymentError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.processed.write().await.push(order.clone());

        let duration = *self.duration.read().await;
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }

        let mut held = self.held.subscribe();
        // Sender lives in self, so this only errors if self is gone.
        let _ = held.wait_for(|held| !*held).await;

        let result = match self.next_error.write().await.take() {
            Some(e) => Err(e),
            None => match self.persistent_error.read().await.clone() {
                Some(e) => Err(e),
                None => Ok(()),
            },
        };

        self.current.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}
