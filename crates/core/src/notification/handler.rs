//! Sequential notification batch handler.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::types::{NotificationError, NotificationEvent};
use crate::codec;
use crate::metrics;
use crate::payment::PaymentProcessor;

/// Processes notification batches one record at a time.
pub struct NotificationHandler {
    processor: Arc<dyn PaymentProcessor>,
}

impl NotificationHandler {
    pub fn new(processor: Arc<dyn PaymentProcessor>) -> Self {
        Self { processor }
    }

    /// Processes every record in order and returns how many were processed.
    ///
    /// Stops at the first failing record. Records before it have already been
    /// processed and will be processed again if the batch is retried.
    pub async fn handle(&self, event: &NotificationEvent) -> Result<usize, NotificationError> {
        info!(records = event.records.len(), "Received notification batch");

        let mut processed = 0;
        for record in &event.records {
            let message_id = record.message_id();

            let mut order = match codec::decode_order(&record.notification.message) {
                Ok(order) => order,
                Err(e) => {
                    error!(
                        message_id,
                        error = %e,
                        body = %record.notification.message,
                        "Failed to decode order, failing batch"
                    );
                    metrics::NOTIFICATION_RECORDS
                        .with_label_values(&["malformed"])
                        .inc();
                    return Err(NotificationError::Malformed {
                        message_id: message_id.to_string(),
                        source: e,
                    });
                }
            };

            if let Err(e) = order.start_processing() {
                debug!(order_id = %order.order_id, error = %e, "Order status already ahead");
            }
            info!(order_id = %order.order_id, customer_id = order.customer_id, "Processing order");

            if let Err(e) = self.processor.process(&order).await {
                warn!(order_id = %order.order_id, error = %e, "Payment failed, failing batch");
                metrics::NOTIFICATION_RECORDS
                    .with_label_values(&["failed"])
                    .inc();
                return Err(NotificationError::Payment {
                    order_id: order.order_id,
                    source: e,
                });
            }

            if let Err(e) = order.complete() {
                warn!(order_id = %order.order_id, error = %e, "Unexpected status transition");
            }
            info!(order_id = %order.order_id, "Completed order");
            metrics::NOTIFICATION_RECORDS
                .with_label_values(&["processed"])
                .inc();
            processed += 1;
        }

        Ok(processed)
    }
}
