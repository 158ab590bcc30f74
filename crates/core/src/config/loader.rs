use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable naming the optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "ORDERFLOW_CONFIG";

/// Plain environment variables accepted for compatibility with existing
/// deployments, and the config keys they set.
const PLAIN_ENV_KEYS: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("PAYMENT_CONCURRENCY", "receiver.payment_concurrency"),
    ("SNS_PUBLISH_TIMEOUT_SECONDS", "receiver.publish_timeout_secs"),
    ("ASYNC_TEST_MODE", "receiver.async_test_mode"),
    ("SNS_TOPIC_ARN", "topic.arn"),
    ("SQS_QUEUE_URL", "queue.url"),
    ("PROCESSOR_CONCURRENCY", "consumer.concurrency"),
    ("PAYMENTSIM_SECONDS", "payment.duration_secs"),
];

/// Load configuration from an optional file with environment variable overrides.
///
/// Later sources win: the TOML file, then `ORDERFLOW_*` variables (`__`
/// separates sections, e.g. `ORDERFLOW_CONSUMER__CONCURRENCY`), then the
/// plain variable names in [`PLAIN_ENV_KEYS`].
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    let config: Config = figment
        .merge(Env::prefixed("ORDERFLOW_").split("__"))
        .merge(plain_env())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn plain_env() -> Env {
    Env::raw().filter_map(|key| {
        PLAIN_ENV_KEYS
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, path)| (*path).into())
    })
}
