use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orderflow_core::{
    load_config, validate_config, InMemoryQueue, MessageSource, OrderPublisher, PaymentProcessor,
    SimulatedPaymentProcessor, Topic, WorkerPoolConsumer, CONFIG_PATH_ENV,
};
use orderflow_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path (optional; environment variables alone are enough)
    let config_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);

    // Load configuration
    match &config_path {
        Some(path) => info!("Loading configuration from {:?}", path),
        None => info!("Loading configuration from environment"),
    }
    let config = load_config(config_path.as_deref()).context("Failed to load config")?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");

    let processor: Arc<dyn PaymentProcessor> =
        Arc::new(SimulatedPaymentProcessor::new(config.payment.duration()));
    info!(
        duration_secs = config.payment.duration_secs,
        "Using simulated payment processor"
    );

    // Create the in-process queue the consumer drains
    let queue = if config.consumer.enabled {
        config.queue.url.as_ref().map(|url| {
            info!(queue = %url, "Initializing in-process queue");
            Arc::new(InMemoryQueue::new(url.clone()))
        })
    } else {
        info!("Consumer disabled in config");
        None
    };

    // Create the topic asynchronous orders are published to
    let topic = config.topic.arn.as_ref().map(|arn| {
        let topic = Arc::new(Topic::new(arn.clone()));
        match &queue {
            Some(queue) => {
                topic.subscribe(Arc::clone(queue));
                info!(topic = %arn, subscribers = topic.subscriber_count(), "Topic ready");
            }
            None => warn!(topic = %arn, "Topic has no subscribers; asynchronous orders will be rejected"),
        }
        topic
    });
    if topic.is_none() {
        info!("No topic configured, asynchronous submission disabled");
    }

    // Start the consumer
    let shutdown = CancellationToken::new();
    let consumer = queue.as_ref().map(|queue| {
        Arc::new(WorkerPoolConsumer::new(
            config.consumer.clone(),
            Arc::clone(queue) as Arc<dyn MessageSource>,
            Arc::clone(&processor),
        ))
    });
    let consumer_handle = consumer.as_ref().map(|consumer| {
        let consumer = Arc::clone(consumer);
        let shutdown = shutdown.clone();
        tokio::spawn(async move { consumer.run(shutdown).await })
    });

    // Create app state
    let mut state = AppState::new(config.clone(), processor);
    if let Some(topic) = topic {
        state = state.with_publisher(topic as Arc<dyn OrderPublisher>);
    }
    if let Some(consumer) = consumer {
        state = state.with_consumer(consumer);
    }
    if let Some(queue) = queue {
        state = state.with_queue(queue);
    }

    // Create router
    let app = create_router(Arc::new(state));

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    // Run server with graceful shutdown
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .await
        .context("Server error");

    // Stop the consumer even if the server failed, and wait for it to drain
    shutdown.cancel();
    if let Some(handle) = consumer_handle {
        info!("Waiting for consumer to drain...");
        handle
            .await
            .context("Consumer task panicked")?
            .context("Consumer failed")?;
        info!("Consumer stopped");
    }

    served?;
    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
