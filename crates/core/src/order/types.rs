//! Order and line item types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by order state transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderError {
    /// Attempted to move an order back to an earlier status.
    #[error("order {order_id}: cannot move from {from} to {to}")]
    StatusRegression {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },
}

/// Processing status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single product line in an order.
///
/// Quantity and price are carried as-is; nothing here validates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub quantity: i64,
    pub price: f64,
}

/// An order as it travels through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub customer_id: i64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Stamped with the decode time when the producer left it out.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a pending order stamped with the current time.
    pub fn new(order_id: impl Into<String>, customer_id: i64, items: Vec<LineItem>) -> Self {
        Self {
            order_id: order_id.into(),
            customer_id,
            status: OrderStatus::Pending,
            items,
            created_at: Utc::now(),
        }
    }

    /// Moves the order to `status`.
    ///
    /// Staying on the current status is allowed; going backwards is not.
    pub fn advance_to(&mut self, status: OrderStatus) -> Result<(), OrderError> {
        if status < self.status {
            return Err(OrderError::StatusRegression {
                order_id: self.order_id.clone(),
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        Ok(())
    }

    /// Marks the order as being processed.
    pub fn start_processing(&mut self) -> Result<(), OrderError> {
        self.advance_to(OrderStatus::Processing)
    }

    /// Marks the order as completed.
    pub fn complete(&mut self) -> Result<(), OrderError> {
        self.advance_to(OrderStatus::Completed)
    }
}

/// An order as submitted over HTTP.
///
/// Clients may omit `status` and `created_at`; the receiver decides both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSubmission {
    pub order_id: String,
    pub customer_id: i64,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderSubmission {
    /// Builds the order with `status`, keeping a client-supplied `created_at`
    /// and stamping the current time otherwise.
    pub fn into_order(self, status: OrderStatus) -> Order {
        Order {
            order_id: self.order_id,
            customer_id: self.customer_id,
            status,
            items: self.items,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order::new(
            "ord-1",
            42,
            vec![LineItem {
                product_id: "prod-1".to_string(),
                quantity: 2,
                price: 5.0,
            }],
        )
    }

    #[test]
    fn test_new_order_is_pending() {
        let order = sample_order();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn test_status_moves_forward() {
        let mut order = sample_order();
        order.start_processing().unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        order.complete().unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
    }

    #[test]
    fn test_status_never_regresses() {
        let mut order = sample_order();
        order.complete().unwrap();

        let err = order.advance_to(OrderStatus::Pending).unwrap_err();
        assert_eq!(
            err,
            OrderError::StatusRegression {
                order_id: "ord-1".to_string(),
                from: OrderStatus::Completed,
                to: OrderStatus::Pending,
            }
        );
        assert_eq!(order.status, OrderStatus::Completed);
    }

    #[test]
    fn test_same_status_is_allowed() {
        let mut order = sample_order();
        order.start_processing().unwrap();
        assert!(order.start_processing().is_ok());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Processing).unwrap(),
            "\"processing\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, OrderStatus::Completed);
        assert!(serde_json::from_str::<OrderStatus>("\"shipped\"").is_err());
    }

    #[test]
    fn test_missing_status_and_items_default() {
        let json = r#"{"order_id":"ord-2","customer_id":7,"created_at":"2024-01-01T00:00:00Z"}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_submission_defaults_created_at() {
        let json = r#"{"order_id":"ord-3","customer_id":9,"items":[{"product_id":"p","quantity":1,"price":1.5}]}"#;
        let submission: OrderSubmission = serde_json::from_str(json).unwrap();
        let before = Utc::now();
        let order = submission.into_order(OrderStatus::Pending);
        assert!(order.created_at >= before);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn test_submission_keeps_created_at() {
        let json = r#"{"order_id":"ord-4","customer_id":9,"status":"completed","created_at":"2024-01-01T00:00:00Z"}"#;
        let submission: OrderSubmission = serde_json::from_str(json).unwrap();
        let order = submission.into_order(OrderStatus::Processing);
        assert_eq!(order.created_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(order.status, OrderStatus::Processing);
    }
}
