pub mod admission;
pub mod codec;
pub mod config;
pub mod consumer;
pub mod metrics;
pub mod notification;
pub mod order;
pub mod payment;
pub mod publisher;
pub mod source;
pub mod testing;

pub use admission::{AdmissionError, AdmissionGate, AdmissionPermit, GateStatus};
pub use codec::{decode, DecodeError, Envelope};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    CONFIG_PATH_ENV,
};
pub use consumer::{
    ConsumerConfig, ConsumerError, ConsumerStats, ConsumerStatus, MessageOutcome,
    WorkerPoolConsumer,
};
pub use notification::{NotificationError, NotificationEvent, NotificationHandler};
pub use order::{LineItem, Order, OrderError, OrderStatus, OrderSubmission};
pub use payment::{PaymentError, PaymentProcessor, SimulatedPaymentProcessor};
pub use publisher::{OrderPublisher, PublishError, Topic};
pub use source::{InMemoryQueue, MessageHandle, MessageSource, ReceivedMessage, SourceError};
