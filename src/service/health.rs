//! The cluster health service.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    is_cluster_stable, Address, ClusterRecord, ClusterStatus, DEFAULT_STABILITY_WINDOW,
};
use crate::ids::IdGenerator;
use crate::observability::metrics;
use crate::probe::{Probe, ProbeError, ProbeReport};
use crate::service::ServiceResult;
use crate::store::RecordStore;

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(120);

/// Input for registering a new cluster.
#[derive(Debug, Clone)]
pub struct RegisterCluster {
    pub name: String,
    pub hosts: Vec<String>,
    pub key: String,
    pub now: DateTime<Utc>,
}

/// Presentation view of a cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub id: String,
    pub name: String,
    pub status: ClusterStatus,
    pub is_stable: bool,
    pub detail: Value,
}

impl ClusterSummary {
    fn from_record(record: &ClusterRecord, now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            id: record.id().to_string(),
            name: record.name().to_string(),
            status: record.status(),
            is_stable: is_cluster_stable(record, now, window),
            detail: record.detail().clone(),
        }
    }
}

/// Probes clusters and folds results into persisted records.
pub struct ClusterHealthService {
    ids: Arc<dyn IdGenerator>,
    probe: Arc<dyn Probe>,
    store: Arc<dyn RecordStore>,
    stability_window: Duration,
    probe_timeout: Duration,
}

impl ClusterHealthService {
    pub fn new(
        ids: Arc<dyn IdGenerator>,
        probe: Arc<dyn Probe>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            ids,
            probe,
            store,
            stability_window: DEFAULT_STABILITY_WINDOW,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_stability_window(mut self, window: Duration) -> Self {
        self.stability_window = window;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Register a cluster. It must pass one health check before it is persisted.
    pub async fn register_cluster(&self, request: RegisterCluster) -> ServiceResult<ClusterSummary> {
        let addresses = Address::parse_all(&request.hosts)?;
        let candidate = ClusterRecord::new(
            self.ids.generate(),
            request.name,
            addresses,
            request.key,
            ClusterStatus::Unknown,
            request.now,
            Value::Null,
        )?;

        let report = self.probe_health(&candidate).await?;
        let cluster = candidate
            .set_status(report.status, report.detail, request.now)?
            .into_owned();

        self.store.create(&cluster).await?;
        metrics::record_cluster_status(cluster.id(), cluster.status());

        tracing::info!(
            cluster_id = %cluster.id(),
            name = %cluster.name(),
            status = %cluster.status(),
            monitors = cluster.addresses().len(),
            "Cluster registered"
        );

        Ok(ClusterSummary::from_record(
            &cluster,
            request.now,
            self.stability_window,
        ))
    }

    /// All persisted clusters with their stability flag. Empty when none exist.
    pub async fn list_clusters(&self, now: DateTime<Utc>) -> ServiceResult<Vec<ClusterSummary>> {
        let records = self.store.list().await?;
        Ok(records
            .iter()
            .map(|r| ClusterSummary::from_record(r, now, self.stability_window))
            .collect())
    }

    /// Re-probe a cluster and persist the result if it changed.
    ///
    /// Returns true iff the cluster is now `ok`. A failed probe is recorded as
    /// `unknown` rather than returned as an error.
    pub async fn refresh_cluster(&self, id: &str, now: DateTime<Utc>) -> ServiceResult<bool> {
        let cluster = self.store.get(id).await?;

        let report = match self.probe_health(&cluster).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(cluster_id = %id, error = %e, "Health check failed, marking cluster unknown");
                ProbeReport::new(ClusterStatus::Unknown, Value::Null)
            }
        };

        let previous = cluster.status();
        let status = report.status;
        let healthy = match cluster.set_status(report.status, report.detail, now)? {
            Cow::Borrowed(unchanged) => unchanged.is_ok(),
            Cow::Owned(changed) => {
                self.store.update(&changed).await?;
                if changed.status() != previous {
                    tracing::info!(
                        cluster_id = %id,
                        from = %previous,
                        to = %changed.status(),
                        "Cluster status changed"
                    );
                }
                changed.is_ok()
            }
        };

        metrics::record_cluster_status(id, status);
        Ok(healthy)
    }

    /// Refresh the cluster's monitor list from the cluster itself.
    ///
    /// Returns true when the stored address list changed.
    pub async fn update_monitors(&self, id: &str) -> ServiceResult<bool> {
        let cluster = self.store.get(id).await?;
        let monitors = tokio::time::timeout(self.probe_timeout, self.probe.monitors(&cluster))
            .await
            .map_err(|_| ProbeError::Timeout(self.probe_timeout.as_secs()))??;

        match cluster.set_addresses(monitors)? {
            Cow::Borrowed(_) => Ok(false),
            Cow::Owned(changed) => {
                self.store.update(&changed).await?;
                tracing::info!(
                    cluster_id = %id,
                    monitors = %join_addresses(changed.addresses()),
                    "Cluster monitors updated"
                );
                Ok(true)
            }
        }
    }

    async fn probe_health(&self, cluster: &ClusterRecord) -> Result<ProbeReport, ProbeError> {
        let result = match tokio::time::timeout(self.probe_timeout, self.probe.health(cluster)).await
        {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.probe_timeout.as_secs())),
        };
        metrics::record_probe(match &result {
            Ok(_) => "success",
            Err(ProbeError::Timeout(_)) => "timeout",
            Err(_) => "failure",
        });
        result
    }
}

fn join_addresses(addresses: &[Address]) -> String {
    addresses
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
