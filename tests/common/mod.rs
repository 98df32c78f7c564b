//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::net::TcpListener;

use cluster_monitor::config::{MonitorConfig, StorageBackend};
use cluster_monitor::domain::{Address, ClusterRecord, ClusterStatus};
use cluster_monitor::http::{AppState, HttpServer};
use cluster_monitor::lifecycle::{build_store, Runtime};
use cluster_monitor::probe::{Probe, ProbeError, ProbeReport};

/// Probe that replays queued health results, then reports `ok` forever.
#[derive(Default)]
pub struct ScriptedProbe {
    health: Mutex<VecDeque<Result<ProbeReport, ProbeError>>>,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn healthy() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(results: Vec<Result<ProbeReport, ProbeError>>) -> Arc<Self> {
        Arc::new(Self {
            health: Mutex::new(results.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn health(&self, _cluster: &ClusterRecord) -> Result<ProbeReport, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.health
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ProbeReport::new(ClusterStatus::Ok, Value::Null)))
    }

    async fn monitors(&self, cluster: &ClusterRecord) -> Result<Vec<Address>, ProbeError> {
        Ok(cluster.addresses().to_vec())
    }
}

pub fn unreachable() -> Result<ProbeReport, ProbeError> {
    Err(ProbeError::CommandFailed {
        status: "exit status: 1".to_string(),
        stderr: "monclient: connection refused".to_string(),
    })
}

/// A running server plus the runtime behind it.
pub struct TestServer {
    pub url: String,
    pub runtime: Runtime,
}

impl TestServer {
    pub async fn stop(self) {
        self.runtime.shutdown.trigger();
        self.runtime
            .scheduler
            .shutdown(std::time::Duration::from_secs(5))
            .await;
    }
}

fn test_config(data_dir: Option<&Path>) -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.maintenance.enabled = false;
    match data_dir {
        Some(dir) => {
            config.storage.backend = StorageBackend::File;
            config.storage.data_dir = dir.display().to_string();
        }
        None => config.storage.backend = StorageBackend::Memory,
    }
    config
}

/// Start a server on an ephemeral port backed by an in-memory store.
pub async fn start_server(probe: Arc<ScriptedProbe>) -> TestServer {
    start_server_with(probe, None).await
}

/// Start a server backed by a file store in `data_dir`.
pub async fn start_server_in(probe: Arc<ScriptedProbe>, data_dir: &Path) -> TestServer {
    start_server_with(probe, Some(data_dir)).await
}

async fn start_server_with(probe: Arc<ScriptedProbe>, data_dir: Option<&Path>) -> TestServer {
    let config = test_config(data_dir);
    let store = build_store(&config.storage).await.unwrap();
    let runtime = Runtime::start_with(&config, probe, store).await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(
        &config.listener,
        AppState {
            service: runtime.service.clone(),
            scheduler: runtime.scheduler.clone(),
        },
    );
    let signal = runtime.shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    TestServer {
        url: format!("http://{}", addr),
        runtime,
    }
}
