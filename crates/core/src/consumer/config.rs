//! Consumer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::source::ReceiveRequest;

/// Configuration for the queue consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerConfig {
    /// Run the consumer in this process.
    ///
    /// On by default, which makes `queue.url` mandatory. Receiver-only
    /// deployments set this to false.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Maximum orders processed concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Maximum messages requested per receive call (1-10).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Long-poll wait per receive call, in seconds (0-20).
    #[serde(default = "default_wait_time")]
    pub wait_time_secs: u64,

    /// How long a delivered message stays hidden, in seconds.
    /// Must exceed the payment duration or messages get redelivered mid-processing.
    #[serde(default = "default_visibility_timeout")]
    pub visibility_timeout_secs: u64,

    /// Delay after a failed receive call (milliseconds).
    #[serde(default = "default_receive_backoff")]
    pub receive_backoff_ms: u64,

    /// Per-message payment time budget in seconds. Unset means no limit.
    #[serde(default)]
    pub processing_timeout_secs: Option<u64>,
}

fn default_enabled() -> bool {
    true
}

fn default_concurrency() -> usize {
    10
}

fn default_batch_size() -> usize {
    10
}

fn default_wait_time() -> u64 {
    20
}

fn default_visibility_timeout() -> u64 {
    60
}

fn default_receive_backoff() -> u64 {
    2000 // 2 seconds
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            concurrency: default_concurrency(),
            batch_size: default_batch_size(),
            wait_time_secs: default_wait_time(),
            visibility_timeout_secs: default_visibility_timeout(),
            receive_backoff_ms: default_receive_backoff(),
            processing_timeout_secs: None,
        }
    }
}

impl ConsumerConfig {
    /// Sets the worker pool size.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the receive batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the back-off after a failed receive.
    pub fn with_receive_backoff(mut self, backoff: Duration) -> Self {
        self.receive_backoff_ms = backoff.as_millis() as u64;
        self
    }

    /// Sets the per-message payment time budget.
    pub fn with_processing_timeout(mut self, timeout_secs: u64) -> Self {
        self.processing_timeout_secs = Some(timeout_secs);
        self
    }

    /// Parameters for each receive call.
    pub fn receive_request(&self) -> ReceiveRequest {
        ReceiveRequest {
            max_messages: self.batch_size,
            wait: Duration::from_secs(self.wait_time_secs),
            visibility_timeout: Duration::from_secs(self.visibility_timeout_secs),
        }
    }

    pub fn receive_backoff(&self) -> Duration {
        Duration::from_millis(self.receive_backoff_ms)
    }

    pub fn processing_timeout(&self) -> Option<Duration> {
        self.processing_timeout_secs.map(Duration::from_secs)
    }
}
