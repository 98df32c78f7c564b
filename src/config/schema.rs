//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the cluster monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// HTTP listener configuration.
    pub listener: ListenerConfig,

    /// Adaptive polling settings.
    pub polling: PollingConfig,

    /// Daily monitor-list maintenance.
    pub maintenance: MaintenanceConfig,

    /// Record store settings.
    pub storage: StorageConfig,

    /// Probe transport settings.
    pub probe: ProbeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Shutdown behaviour.
    pub shutdown: ShutdownConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds. Registration probes synchronously, so keep this
    /// above `polling.probe_timeout_secs`.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 150,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Adaptive polling configuration.
///
/// Poll levels map to intervals: 0 → long, 1 → medium, 2 → short.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Interval used once a cluster has proven healthy (level 0).
    pub long_interval_secs: u64,

    /// Interval at level 1.
    pub medium_interval_secs: u64,

    /// Interval used while a cluster is failing (level 2).
    pub short_interval_secs: u64,

    /// Time since the last bad observation before a cluster counts as stable.
    pub stability_window_secs: u64,

    /// Deadline for a single probe call.
    pub probe_timeout_secs: u64,
}

impl PollingConfig {
    /// Intervals indexed by poll level.
    pub fn level_intervals(&self) -> Vec<Duration> {
        vec![
            Duration::from_secs(self.long_interval_secs),
            Duration::from_secs(self.medium_interval_secs),
            Duration::from_secs(self.short_interval_secs),
        ]
    }

    pub fn stability_window(&self) -> Duration {
        Duration::from_secs(self.stability_window_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            long_interval_secs: 6 * 60,
            medium_interval_secs: 3 * 60,
            short_interval_secs: 60,
            stability_window_secs: 3 * 60,
            probe_timeout_secs: 120,
        }
    }
}

/// Daily maintenance configuration (UTC wall clock).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Run the daily monitor refresh.
    pub enabled: bool,

    /// Hour of day (0-23, UTC).
    pub hour: u32,

    /// Minute of hour (0-59).
    pub minute: u32,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hour: 0,
            minute: 0,
        }
    }
}

/// Which record store implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

/// Record store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Directory holding one JSON document per cluster (file backend).
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: "./data/clusters".to_string(),
        }
    }
}

/// Probe transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Container runtime binary.
    pub runtime: String,

    /// Ceph container image (without tag).
    pub image: String,

    /// Ceph release; the image tag is `v<version>`.
    pub version: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            runtime: "podman".to_string(),
            image: "quay.io/ceph/ceph".to_string(),
            version: "20.1.1".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long to wait for in-flight polls before aborting them.
    pub drain_timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout_secs: 10,
        }
    }
}

impl ShutdownConfig {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_secs)
    }
}
