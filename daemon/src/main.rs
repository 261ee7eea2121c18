//! CivicPulse daemon — entry point for running the core engine.
//!
//! The engine is a library; the HTTP/WebSocket routing layer consumes it
//! in production. This binary runs it standalone: useful for soak-testing
//! the sweep/shutdown behavior and as the wiring reference for embedders.

use clap::Parser;
use pulse_alerts::{NotificationPayload, NotificationSender, RuleSet, SendFuture};
use pulse_engine::{CivicEngine, EngineConfig};
use pulse_types::Channel;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[derive(Parser)]
#[command(name = "pulse-daemon", about = "CivicPulse core engine daemon")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, env = "PULSE_CONFIG")]
    config: Option<PathBuf>,

    /// Cooldown window in seconds (overrides the config file).
    #[arg(long, env = "PULSE_COOLDOWN_SECS")]
    cooldown_secs: Option<u64>,

    /// Sweep interval in seconds (overrides the config file).
    #[arg(long, env = "PULSE_SWEEP_SECS")]
    sweep_secs: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "PULSE_LOG_LEVEL")]
    log_level: String,
}

/// Stand-in gateway that logs instead of sending. The real email/SMS
/// gateway is injected by the embedding service.
struct LoggingSender;

impl NotificationSender for LoggingSender {
    fn send(&self, channel: Channel, payload: NotificationPayload) -> SendFuture {
        info!(%channel, title = %payload.title, severity = %payload.severity, "would send notification");
        Box::pin(async { Ok(()) })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    pulse_utils::init_tracing_with(&cli.log_level);

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_toml_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(secs) = cli.cooldown_secs {
        config.cooldown_window_secs = secs;
    }
    if let Some(secs) = cli.sweep_secs {
        config.sweep_interval_secs = secs;
    }

    let engine = CivicEngine::new(config, RuleSet::standard(), Arc::new(LoggingSender));
    let sweep = engine.start_sweep();

    info!("engine running; Ctrl-C to stop");
    wait_for_signal().await;
    engine.shutdown();
    sweep.await?;
    info!("engine stopped");
    Ok(())
}

/// Block until SIGINT or SIGTERM.
async fn wait_for_signal() {
    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
