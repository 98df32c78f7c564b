//! Probe that shells out to the Ceph CLI inside a container.

use std::path::Path;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::process::Command;

use crate::config::ProbeConfig;
use crate::domain::{Address, ClusterRecord};
use crate::probe::ceph::{HealthDetail, MonDump};
use crate::probe::{Probe, ProbeError, ProbeReport};

const CEPH_CONF: &str = "ceph.conf";
const KEYRING: &str = "ceph.client.admin.keyring";

/// Runs `ceph` commands through a container runtime (podman by default).
#[derive(Debug, Clone)]
pub struct CommandProbe {
    runtime: String,
    image: String,
}

impl CommandProbe {
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            runtime: config.runtime.clone(),
            image: format!("{}:v{}", config.image, config.version),
        }
    }

    /// Container image reference the probe runs.
    pub fn image(&self) -> &str {
        &self.image
    }

    async fn run_ceph(&self, cluster: &ClusterRecord, args: &[&str]) -> Result<Vec<u8>, ProbeError> {
        // Dropping the TempDir removes the rendered key material.
        let dir = tempfile::Builder::new()
            .prefix("cluster-monitor")
            .tempdir()
            .map_err(ProbeError::Setup)?;
        write_client_files(dir.path(), cluster).await?;

        let volume = format!("{}:/etc/ceph", dir.path().display());

        tracing::debug!(
            cluster_id = %cluster.id(),
            runtime = %self.runtime,
            image = %self.image,
            command = %args.join(" "),
            "Running ceph probe"
        );

        let output = Command::new(&self.runtime)
            .args(["run", "--rm", "-v", &volume, &self.image, "ceph"])
            .args(args)
            .args(["-f", "json"])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProbeError::Spawn {
                program: self.runtime.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

/// Render `ceph.conf` and the admin keyring for one cluster.
async fn write_client_files(dir: &Path, cluster: &ClusterRecord) -> Result<(), ProbeError> {
    let mut hosts: Vec<String> = cluster.addresses().iter().map(ToString::to_string).collect();
    // Fresh monitor order per probe.
    hosts.shuffle(&mut rand::thread_rng());

    tokio::fs::write(dir.join(CEPH_CONF), render_conf(&hosts))
        .await
        .map_err(ProbeError::Setup)?;
    tokio::fs::write(dir.join(KEYRING), render_keyring(cluster.key()))
        .await
        .map_err(ProbeError::Setup)?;
    Ok(())
}

fn render_conf(hosts: &[String]) -> String {
    format!("[global]\n\tmon_host = {}\n", hosts.join(","))
}

fn render_keyring(key: &str) -> String {
    format!("[client.admin]\n\tkey = {key}\n")
}

#[async_trait]
impl Probe for CommandProbe {
    async fn health(&self, cluster: &ClusterRecord) -> Result<ProbeReport, ProbeError> {
        let stdout = self.run_ceph(cluster, &["health", "detail"]).await?;
        let detail: HealthDetail = serde_json::from_slice(&stdout)?;
        Ok(detail.into())
    }

    async fn monitors(&self, cluster: &ClusterRecord) -> Result<Vec<Address>, ProbeError> {
        let stdout = self.run_ceph(cluster, &["mon", "dump"]).await?;
        let dump: MonDump = serde_json::from_slice(&stdout)?;
        Ok(dump.addresses())
    }
}
