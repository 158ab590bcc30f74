use super::{types::Config, ConfigError};

/// Largest batch a single receive call may request.
const MAX_BATCH_SIZE: usize = 10;

/// Longest long-poll wait a receive call may request, in seconds.
const MAX_WAIT_TIME_SECS: u64 = 20;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Concurrency limits and batch size are positive, batch size and wait are in range
/// - Visibility timeout exceeds the payment duration
/// - An enabled consumer has a queue to drain
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.receiver.payment_concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "receiver.payment_concurrency must be at least 1".to_string(),
        ));
    }

    let duration = config.payment.duration_secs;
    if !duration.is_finite() || duration < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "payment.duration_secs must be a non-negative number, got {}",
            duration
        )));
    }

    // Consumer validation
    let consumer = &config.consumer;
    if !consumer.enabled {
        return Ok(());
    }

    if config.queue.url.as_deref().map_or(true, str::is_empty) {
        return Err(ConfigError::MissingQueueUrl);
    }

    if consumer.concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "consumer.concurrency must be at least 1".to_string(),
        ));
    }

    if consumer.batch_size == 0 || consumer.batch_size > MAX_BATCH_SIZE {
        return Err(ConfigError::ValidationError(format!(
            "consumer.batch_size must be between 1 and {}, got {}",
            MAX_BATCH_SIZE, consumer.batch_size
        )));
    }

    if consumer.wait_time_secs > MAX_WAIT_TIME_SECS {
        return Err(ConfigError::ValidationError(format!(
            "consumer.wait_time_secs cannot exceed {}, got {}",
            MAX_WAIT_TIME_SECS, consumer.wait_time_secs
        )));
    }

    // A message still being paid for must not become visible again.
    if (consumer.visibility_timeout_secs as f64) <= duration {
        return Err(ConfigError::ValidationError(format!(
            "consumer.visibility_timeout_secs ({}) must exceed payment.duration_secs ({})",
            consumer.visibility_timeout_secs, duration
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.queue.url = Some("memory://orders".to_string());
        config
    }

    fn assert_invalid(config: &Config) {
        let err = validate_config(config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)), "{:?}", err);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = valid_config();
        config.server.port = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_missing_queue_url() {
        let config = Config::default();
        assert!(matches!(
            validate_config(&config).unwrap_err(),
            ConfigError::MissingQueueUrl
        ));
    }

    #[test]
    fn test_missing_queue_url_error_explains_receiver_only_mode() {
        let message = validate_config(&Config::default()).unwrap_err().to_string();
        assert!(message.contains("SQS_QUEUE_URL"));
        assert!(message.contains("ORDERFLOW_CONSUMER__ENABLED=false"));
    }

    #[test]
    fn test_validate_disabled_consumer_needs_no_queue() {
        let mut config = Config::default();
        config.consumer.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_concurrency_fails() {
        let mut config = valid_config();
        config.consumer.concurrency = 0;
        assert_invalid(&config);

        let mut config = valid_config();
        config.receiver.payment_concurrency = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_batch_size_range() {
        let mut config = valid_config();
        config.consumer.batch_size = 0;
        assert_invalid(&config);

        config.consumer.batch_size = 11;
        assert_invalid(&config);

        config.consumer.batch_size = 10;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_wait_time_limit() {
        let mut config = valid_config();
        config.consumer.wait_time_secs = 21;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_visibility_must_exceed_payment() {
        let mut config = valid_config();
        config.consumer.visibility_timeout_secs = 3;
        config.payment.duration_secs = 3.0;
        assert_invalid(&config);

        config.consumer.visibility_timeout_secs = 4;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_negative_payment_duration() {
        let mut config = valid_config();
        config.payment.duration_secs = -1.0;
        assert_invalid(&config);
    }
}
