//! Cluster probing.
//!
//! # Data Flow
//! ```text
//! ClusterHealthService
//!     → Probe::health(cluster)   → ProbeReport { status, detail }
//!     → Probe::monitors(cluster) → Vec<Address>   (daily maintenance)
//!
//! CommandProbe (command.rs):
//!     render ceph.conf + keyring into a private temp dir
//!     → <runtime> run --rm -v dir:/etc/ceph <image> ceph ... -f json
//!     → ceph.rs decodes the JSON payload
//! ```
//!
//! # Design Decisions
//! - Probes never retry; one failed call is one unknown cycle
//! - Every ProbeError is a transport failure from the service's point of view
//! - Deadlines are applied by the caller, probes only need to be cancel-safe

pub mod ceph;
pub mod command;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{Address, ClusterRecord, ClusterStatus};

pub use command::CommandProbe;

/// Result of a single successful health probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub status: ClusterStatus,
    /// Opaque diagnostic payload; `Value::Null` when there is nothing to report.
    pub detail: Value,
}

impl ProbeReport {
    pub fn new(status: ClusterStatus, detail: Value) -> Self {
        Self { status, detail }
    }
}

/// Transport-level probe failures.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to prepare probe environment: {0}")]
    Setup(#[source] std::io::Error),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("probe command exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    #[error("failed to decode probe output: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("probe timed out after {0} seconds")]
    Timeout(u64),
}

/// Capability to query a cluster's health and monitor list.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Fetch the cluster's current health.
    async fn health(&self, cluster: &ClusterRecord) -> Result<ProbeReport, ProbeError>;

    /// Fetch the cluster's current monitor endpoints.
    async fn monitors(&self, cluster: &ClusterRecord) -> Result<Vec<Address>, ProbeError>;
}
