//! Queue consumer status API.

use axum::{extract::State, Json};
use orderflow_core::ConsumerStatus;
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

/// Consumer status response
#[derive(Debug, Serialize)]
pub struct ConsumerStatusResponse {
    /// Whether a consumer exists in this process.
    pub available: bool,
    #[serde(flatten)]
    pub status: Option<ConsumerStatus>,
}

/// Get the queue consumer status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<ConsumerStatusResponse> {
    let status = state.consumer().map(|consumer| consumer.status());
    Json(ConsumerStatusResponse {
        available: status.is_some(),
        status,
    })
}
