//! Startup orchestration.
//!
//! Subsystems initialize in dependency order: store, probe, service,
//! scheduler. Stored clusters are resumed before the HTTP listener starts.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{MonitorConfig, StorageBackend, StorageConfig};
use crate::ids::SortableIdGenerator;
use crate::lifecycle::Shutdown;
use crate::probe::{CommandProbe, Probe};
use crate::scheduler::{AdaptiveScheduler, LevelIntervals, MaintenanceWindow};
use crate::service::{ClusterHealthService, ServiceError};
use crate::store::{FileStore, MemoryStore, RecordStore, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to resume clusters: {0}")]
    Resume(#[from] ServiceError),
}

/// Open the configured record store.
pub async fn build_store(config: &StorageConfig) -> Result<Arc<dyn RecordStore>, StoreError> {
    match config.backend {
        StorageBackend::File => {
            let store = FileStore::open(&config.data_dir).await?;
            tracing::info!(data_dir = %store.dir().display(), "Using file store");
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store, clusters are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// The running core: service plus the scheduler driving it.
pub struct Runtime {
    pub service: Arc<ClusterHealthService>,
    pub scheduler: AdaptiveScheduler,
    pub shutdown: Shutdown,
}

impl Runtime {
    /// Start with the store and probe named in the config.
    pub async fn start(config: &MonitorConfig) -> Result<Self, StartupError> {
        let store = build_store(&config.storage).await?;
        let probe = CommandProbe::new(&config.probe);
        tracing::info!(
            runtime = %config.probe.runtime,
            image = %probe.image(),
            "Probe configured"
        );
        Self::start_with(config, Arc::new(probe), store).await
    }

    /// Start with caller-provided probe and store.
    pub async fn start_with(
        config: &MonitorConfig,
        probe: Arc<dyn Probe>,
        store: Arc<dyn RecordStore>,
    ) -> Result<Self, StartupError> {
        let service = Arc::new(
            ClusterHealthService::new(Arc::new(SortableIdGenerator), probe, store)
                .with_stability_window(config.polling.stability_window())
                .with_probe_timeout(config.polling.probe_timeout()),
        );

        let maintenance = MaintenanceWindow::from_config(&config.maintenance);
        if maintenance.is_none() {
            tracing::info!("Daily monitor maintenance disabled");
        }

        let shutdown = Shutdown::new();
        let scheduler = AdaptiveScheduler::new(
            Arc::clone(&service),
            LevelIntervals::from_config(&config.polling),
            maintenance,
            shutdown.clone(),
        );
        scheduler.resume_all().await?;

        Ok(Self {
            service,
            scheduler,
            shutdown,
        })
    }
}
