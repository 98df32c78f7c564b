//! Cluster monitor daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!     monitor-cli / SDK            ┌───────────────────────────────────────────────┐
//!     ─────────────────────────────┼─▶ http (axum)                                 │
//!       POST /clusters             │      │ register / list                        │
//!       GET  /clusters             │      ▼                                        │
//!                                  │   service ──▶ probe (podman + ceph CLI) ──────┼──▶ Ceph monitors
//!                                  │      │  ▲                                     │
//!                                  │      ▼  │ refresh / update monitors           │
//!                                  │   store      scheduler (per-cluster loops)    │
//!                                  │  (JSON files)                                 │
//!                                  │                                               │
//!                                  │   config · observability · lifecycle          │
//!                                  └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cluster_monitor::config::{load_config, validation::validate_config, ConfigError, MonitorConfig};
use cluster_monitor::http::{AppState, HttpServer};
use cluster_monitor::lifecycle::{shutdown_signal, Runtime};
use cluster_monitor::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "cluster-monitor")]
#[command(about = "Adaptive health monitor for Ceph clusters", long_about = None)]
struct Args {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(long)]
    bind: Option<String>,

    /// Override storage.data_dir
    #[arg(long)]
    data_dir: Option<String>,
}

impl Args {
    fn into_config(self) -> Result<MonitorConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => MonitorConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(dir) = self.data_dir {
            config.storage.data_dir = dir;
        }
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse().into_config()?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("cluster-monitor v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = ?config.storage.backend,
        data_dir = %config.storage.data_dir,
        intervals_secs = ?[
            config.polling.long_interval_secs,
            config.polling.medium_interval_secs,
            config.polling.short_interval_secs,
        ],
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let runtime = Runtime::start(&config).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let trigger = runtime.shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.trigger();
    });

    let state = AppState {
        service: runtime.service.clone(),
        scheduler: runtime.scheduler.clone(),
    };
    HttpServer::new(&config.listener, state)
        .run(listener, runtime.shutdown.subscribe())
        .await?;

    runtime
        .scheduler
        .shutdown(config.shutdown.drain_timeout())
        .await;

    tracing::info!("Shutdown complete");
    Ok(())
}
