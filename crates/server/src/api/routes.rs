use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{consumer, events, handlers, middleware::metrics_middleware, orders};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        // Consumer
        .route("/consumer/status", get(consumer::get_status))
        // Notification batches
        .route("/events/notifications", post(events::handle_notifications));

    if state.config().receiver.enabled {
        router = router
            .route("/orders/sync", post(orders::submit_sync))
            .route("/orders/async", post(orders::submit_async));
    }

    router
        .route_layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
