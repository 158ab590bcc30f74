//! Notification batch API.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use orderflow_core::{NotificationError, NotificationEvent};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use super::ErrorResponse;
use crate::state::AppState;

/// Response for a processed batch
#[derive(Debug, Serialize)]
pub struct NotificationBatchResponse {
    pub processed: usize,
}

/// Process a batch of notification records.
///
/// Any failing record fails the whole batch with a non-2xx status so the
/// sender redelivers it.
pub async fn handle_notifications(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<NotificationBatchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let event: NotificationEvent = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Invalid notification batch");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid request")),
        )
    })?;

    match state.notifications().handle(&event).await {
        Ok(processed) => Ok(Json(NotificationBatchResponse { processed })),
        Err(e @ NotificationError::Malformed { .. }) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new(e.to_string())),
        )),
        Err(e @ NotificationError::Payment { .. }) => Err((
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new(e.to_string())),
        )),
    }
}
