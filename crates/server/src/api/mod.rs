pub mod consumer;
pub mod events;
pub mod handlers;
pub mod middleware;
pub mod orders;
pub mod routes;

pub use routes::create_router;

use serde::Serialize;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
