mod loader;
mod types;
mod validate;

pub use loader::{load_config, load_config_from_str, CONFIG_PATH_ENV};
pub use types::*;
pub use validate::validate_config;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error(
        "queue.url (SQS_QUEUE_URL) is required when the consumer is enabled; \
         set consumer.enabled = false (ORDERFLOW_CONSUMER__ENABLED=false) to run only the receiver"
    )]
    MissingQueueUrl,
}
