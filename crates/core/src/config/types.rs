use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

use crate::consumer::ConsumerConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub receiver: ReceiverConfig,
    #[serde(default)]
    pub consumer: ConsumerConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub topic: TopicConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// HTTP order receiver configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReceiverConfig {
    /// Serve the order routes.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum synchronous orders paid concurrently (default: 20)
    #[serde(default = "default_payment_concurrency")]
    pub payment_concurrency: usize,
    /// Publish timeout for asynchronous orders in seconds (default: 5)
    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_secs: u64,
    /// Accept asynchronous orders without publishing them.
    #[serde(default)]
    pub async_test_mode: bool,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            payment_concurrency: default_payment_concurrency(),
            publish_timeout_secs: default_publish_timeout(),
            async_test_mode: false,
        }
    }
}

impl ReceiverConfig {
    pub fn publish_timeout(&self) -> Duration {
        Duration::from_secs(self.publish_timeout_secs)
    }
}

fn default_true() -> bool {
    true
}

fn default_payment_concurrency() -> usize {
    20
}

fn default_publish_timeout() -> u64 {
    5
}

/// Queue the consumer drains
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Queue address. Required when the consumer is enabled.
    #[serde(default)]
    pub url: Option<String>,
}

/// Topic asynchronous orders are published to
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TopicConfig {
    /// Topic address. Asynchronous submission is unavailable without it.
    #[serde(default)]
    pub arn: Option<String>,
}

/// Simulated payment configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentConfig {
    /// Time each payment takes, in seconds (default: 3)
    #[serde(default = "default_payment_duration")]
    pub duration_secs: f64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_payment_duration(),
        }
    }
}

impl PaymentConfig {
    /// Payment duration. Call only on a validated config.
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs).unwrap_or_default()
    }
}

fn default_payment_duration() -> f64 {
    3.0
}

/// Sanitized config for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub receiver: ReceiverConfig,
    pub consumer: ConsumerConfig,
    pub queue: SanitizedEndpoint,
    pub topic: SanitizedEndpoint,
    pub payment: PaymentConfig,
}

/// Whether an external endpoint is configured, and where
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedEndpoint {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl SanitizedEndpoint {
    fn from_address(address: Option<&String>) -> Self {
        Self {
            configured: address.is_some(),
            address: address.cloned(),
        }
    }
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            receiver: config.receiver.clone(),
            consumer: config.consumer.clone(),
            queue: SanitizedEndpoint::from_address(config.queue.url.as_ref()),
            topic: SanitizedEndpoint::from_address(config.topic.arn.as_ref()),
            payment: config.payment.clone(),
        }
    }
}
