//! Sleep-based payment simulation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use super::traits::{PaymentError, PaymentProcessor};
use crate::metrics;
use crate::order::Order;

/// Simulates payment verification by waiting a fixed duration. Never fails.
#[derive(Debug, Clone)]
pub struct SimulatedPaymentProcessor {
    duration: Duration,
}

impl SimulatedPaymentProcessor {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for SimulatedPaymentProcessor {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedPaymentProcessor {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn process(&self, order: &Order) -> Result<(), PaymentError> {
        let start = Instant::now();
        debug!(order_id = %order.order_id, duration_ms = self.duration.as_millis() as u64, "Simulating payment");

        tokio::time::sleep(self.duration).await;

        metrics::PAYMENT_DURATION
            .with_label_values(&[self.name()])
            .observe(start.elapsed().as_secs_f64());
        Ok(())
    }
}
