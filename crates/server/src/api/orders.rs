//! Order submission API handlers.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use orderflow_core::{
    metrics::SYNC_ORDERS, Order, OrderStatus, OrderSubmission, PublishError,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::ErrorResponse;
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for an accepted asynchronous order
#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub order_id: String,
    pub status: OrderStatus,
    /// Id assigned by the topic. Absent when publishing is bypassed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(error)))
}

fn parse_submission(body: &[u8]) -> Result<OrderSubmission, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Invalid order submission");
        api_error(StatusCode::BAD_REQUEST, "Invalid request")
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// Process an order's payment before responding.
///
/// At most `receiver.payment_concurrency` payments run at once; further
/// requests wait for a slot.
pub async fn submit_sync(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Order>, ApiError> {
    let mut order = parse_submission(&body)?.into_order(OrderStatus::Processing);

    let _permit = state.payment_gate().acquire().await.map_err(|e| {
        api_error(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
    })?;

    if let Err(e) = state.processor().process(&order).await {
        warn!(order_id = %order.order_id, error = %e, "Synchronous payment failed");
        SYNC_ORDERS.with_label_values(&["failed"]).inc();
        return Err(api_error(StatusCode::BAD_GATEWAY, e.to_string()));
    }

    if let Err(e) = order.complete() {
        warn!(order_id = %order.order_id, error = %e, "Unexpected status transition");
    }
    SYNC_ORDERS.with_label_values(&["completed"]).inc();
    info!(order_id = %order.order_id, customer_id = order.customer_id, "Completed synchronous order");

    Ok(Json(order))
}

/// Publish an order for asynchronous processing.
pub async fn submit_async(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<AcceptedResponse>), ApiError> {
    let receiver = &state.config().receiver;

    if receiver.async_test_mode {
        let order = parse_submission(&body)?.into_order(OrderStatus::Pending);
        info!(order_id = %order.order_id, "Accepted order without publishing (test mode)");
        return Ok((
            StatusCode::ACCEPTED,
            Json(AcceptedResponse {
                order_id: order.order_id,
                status: order.status,
                message_id: None,
            }),
        ));
    }

    let Some(publisher) = state.publisher() else {
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "async endpoint not configured",
        ));
    };

    let order = parse_submission(&body)?.into_order(OrderStatus::Pending);

    let published = tokio::time::timeout(receiver.publish_timeout(), publisher.publish(&order))
        .await
        .unwrap_or(Err(PublishError::TimedOut));

    match published {
        Ok(message_id) => {
            info!(order_id = %order.order_id, message_id = %message_id, "Published order");
            Ok((
                StatusCode::ACCEPTED,
                Json(AcceptedResponse {
                    order_id: order.order_id,
                    status: order.status,
                    message_id: Some(message_id),
                }),
            ))
        }
        Err(e @ PublishError::Encode(_)) => {
            warn!(order_id = %order.order_id, error = %e, "Failed to encode order");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to accept order",
            ))
        }
        Err(e) => {
            warn!(order_id = %order.order_id, error = %e, "Failed to publish order");
            Err(api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "Failed to accept order",
            ))
        }
    }
}
