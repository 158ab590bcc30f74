use std::sync::Arc;

use orderflow_core::{
    AdmissionGate, Config, InMemoryQueue, NotificationHandler, OrderPublisher, PaymentProcessor,
    SanitizedConfig, WorkerPoolConsumer,
};

/// Shared application state
pub struct AppState {
    config: Config,
    payment_gate: AdmissionGate,
    processor: Arc<dyn PaymentProcessor>,
    publisher: Option<Arc<dyn OrderPublisher>>,
    consumer: Option<Arc<WorkerPoolConsumer>>,
    queue: Option<Arc<InMemoryQueue>>,
    notifications: NotificationHandler,
}

impl AppState {
    /// Creates state for the receiver. The payment gate is sized from
    /// `receiver.payment_concurrency`.
    pub fn new(config: Config, processor: Arc<dyn PaymentProcessor>) -> Self {
        let payment_gate = AdmissionGate::new("payment", config.receiver.payment_concurrency);
        let notifications = NotificationHandler::new(Arc::clone(&processor));
        Self {
            config,
            payment_gate,
            processor,
            publisher: None,
            consumer: None,
            queue: None,
            notifications,
        }
    }

    /// Enables asynchronous submission through `publisher`.
    pub fn with_publisher(mut self, publisher: Arc<dyn OrderPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Exposes the status of a consumer running in this process.
    pub fn with_consumer(mut self, consumer: Arc<WorkerPoolConsumer>) -> Self {
        self.consumer = Some(consumer);
        self
    }

    /// Reports the depth of an in-process queue in metrics.
    pub fn with_queue(mut self, queue: Arc<InMemoryQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn payment_gate(&self) -> &AdmissionGate {
        &self.payment_gate
    }

    pub fn processor(&self) -> &dyn PaymentProcessor {
        self.processor.as_ref()
    }

    pub fn publisher(&self) -> Option<&Arc<dyn OrderPublisher>> {
        self.publisher.as_ref()
    }

    pub fn consumer(&self) -> Option<&Arc<WorkerPoolConsumer>> {
        self.consumer.as_ref()
    }

    pub fn queue(&self) -> Option<&Arc<InMemoryQueue>> {
        self.queue.as_ref()
    }

    pub fn notifications(&self) -> &NotificationHandler {
        &self.notifications
    }
}
