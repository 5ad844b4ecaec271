//! providerwatch - standalone provider health watcher
//!
//! Probes the providers listed in the config file on a fixed period and
//! publishes stable health state transitions.

use providerwatch::{
    Config, HealthCheckScheduler, HealthEventBus, HealthHistoryTracker, HttpHealthProbe,
    JsonlObservationStore, MemoryObservationStore, NullEventBus, ObservationStore,
    ProbeOrchestrator, WebhookEventBus,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Initialize logging system
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> providerwatch::Result<()> {
    let config_path = std::env::var("PROVIDERWATCH_CONFIG")
        .unwrap_or_else(|_| "config/providerwatch.yaml".to_string());
    let mut config = Config::from_file(&config_path).await?;
    config.monitor.apply_env_overrides()?;

    info!(
        "{} v{} watching {} providers",
        providerwatch::NAME,
        providerwatch::VERSION,
        config.providers.len()
    );

    let registry = Arc::new(config.registry());
    let probe = Arc::new(HttpHealthProbe::new()?);

    let store: Arc<dyn ObservationStore> = match &config.observations_file {
        Some(path) => Arc::new(JsonlObservationStore::open(path).await?),
        None => {
            info!("No observations_file configured, keeping observations in memory");
            Arc::new(MemoryObservationStore::new())
        }
    };

    let bus: Arc<dyn HealthEventBus> = match &config.webhook_url {
        Some(url) => {
            info!("Publishing health events to {}", url);
            Arc::new(WebhookEventBus::new(url)?)
        }
        None => {
            info!("No webhook_url configured, health events will be dropped");
            Arc::new(NullEventBus::new())
        }
    };

    let tracker = Arc::new(HealthHistoryTracker::new(
        config.monitor.hysteresis.window_size,
        config.monitor.hysteresis.confirmation_streak,
    ));

    let orchestrator = Arc::new(ProbeOrchestrator::new(
        registry,
        probe,
        store,
        bus,
        tracker,
        &config.monitor,
    ));
    let scheduler = HealthCheckScheduler::new(orchestrator, config.monitor.clone());

    let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
    let scheduler_handle = scheduler.spawn(stop_rx);

    shutdown_signal().await;
    stop_tx.send(true).ok();

    if let Err(e) = scheduler_handle.await {
        warn!("Scheduler task ended abnormally: {}", e);
    }
    info!("Shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C signal, shutting down gracefully"),
            Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received terminate signal, shutting down gracefully");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                // Wait indefinitely if signal handler fails
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
