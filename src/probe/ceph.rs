//! Ceph JSON payloads and their mapping onto the domain.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Address, ClusterStatus};
use crate::probe::ProbeReport;

/// Output of `ceph health detail -f json`.
#[derive(Debug, Deserialize)]
pub struct HealthDetail {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub checks: BTreeMap<String, Value>,
}

/// Output of `ceph mon dump -f json`, reduced to what we read.
#[derive(Debug, Deserialize)]
pub struct MonDump {
    #[serde(default)]
    pub mons: Vec<Mon>,
}

#[derive(Debug, Deserialize)]
pub struct Mon {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub public_addrs: PublicAddrs,
    #[serde(default)]
    pub addr: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PublicAddrs {
    #[serde(default)]
    pub addrvec: Vec<AddrVecEntry>,
}

#[derive(Debug, Deserialize)]
pub struct AddrVecEntry {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub addr: String,
}

/// Map a Ceph health string onto the simplified status.
pub fn status_from_ceph(raw: &str) -> ClusterStatus {
    match raw.trim() {
        "HEALTH_OK" => ClusterStatus::Ok,
        "HEALTH_WARN" => ClusterStatus::Warning,
        "HEALTH_ERR" => ClusterStatus::Error,
        _ => ClusterStatus::Unknown,
    }
}

impl From<HealthDetail> for ProbeReport {
    fn from(health: HealthDetail) -> Self {
        let status = status_from_ceph(&health.status);
        let detail = if health.checks.is_empty() {
            Value::Null
        } else {
            Value::Object(health.checks.into_iter().collect())
        };
        ProbeReport::new(status, detail)
    }
}

impl Mon {
    /// Pick the monitor's messenger v1 endpoint, falling back to whatever is listed.
    fn endpoint(&self) -> Option<&str> {
        let vec = &self.public_addrs.addrvec;
        vec.iter()
            .find(|a| a.kind == "v1")
            .or_else(|| vec.first())
            .map(|a| a.addr.as_str())
            .or_else(|| (!self.addr.is_empty()).then_some(self.addr.as_str()))
    }
}

impl MonDump {
    /// Monitor endpoints in dump order. Entries that do not parse are skipped.
    pub fn addresses(&self) -> Vec<Address> {
        self.mons
            .iter()
            .filter_map(|mon| {
                let raw = mon.endpoint()?;
                // Legacy form carries a nonce: "10.0.0.1:6789/0".
                let raw = raw.split('/').next().unwrap_or(raw);
                match raw.parse::<SocketAddr>() {
                    Ok(sa) => Address::new(sa.ip(), sa.port()).ok(),
                    Err(_) => {
                        tracing::warn!(mon = %mon.name, addr = %raw, "Skipping unparseable monitor address");
                        None
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn health_detail_maps_status_and_checks() {
        let raw = json!({
            "status": "HEALTH_WARN",
            "checks": {
                "OSD_DOWN": {
                    "severity": "HEALTH_WARN",
                    "summary": {"message": "1 osds down", "count": 1},
                    "muted": false
                }
            },
            "mutes": []
        });
        let detail: HealthDetail = serde_json::from_value(raw).unwrap();
        let report = ProbeReport::from(detail);

        assert_eq!(report.status, ClusterStatus::Warning);
        assert_eq!(report.detail["OSD_DOWN"]["summary"]["count"], 1);
    }

    #[test]
    fn healthy_cluster_has_empty_detail() {
        let detail: HealthDetail =
            serde_json::from_value(json!({"status": "HEALTH_OK", "checks": {}})).unwrap();
        assert_eq!(ProbeReport::from(detail), ProbeReport::new(ClusterStatus::Ok, Value::Null));
    }

    #[test]
    fn unrecognised_status_is_unknown() {
        assert_eq!(status_from_ceph("HEALTH_ERR"), ClusterStatus::Error);
        assert_eq!(status_from_ceph(" HEALTH_OK\n"), ClusterStatus::Ok);
        assert_eq!(status_from_ceph(""), ClusterStatus::Unknown);
        assert_eq!(status_from_ceph("HEALTH_MAYBE"), ClusterStatus::Unknown);
    }

    #[test]
    fn mon_dump_prefers_v1_endpoints() {
        let raw = json!({
            "epoch": 3,
            "mons": [
                {
                    "name": "a",
                    "public_addrs": {"addrvec": [
                        {"type": "v2", "addr": "10.0.0.1:3300", "nonce": 0},
                        {"type": "v1", "addr": "10.0.0.1:6789", "nonce": 0}
                    ]},
                    "addr": "10.0.0.1:6789/0"
                },
                {
                    "name": "b",
                    "public_addrs": {"addrvec": []},
                    "addr": "10.0.0.2:6789/0"
                },
                {
                    "name": "c",
                    "public_addrs": {"addrvec": [{"type": "v2", "addr": "bogus", "nonce": 0}]}
                }
            ]
        });
        let dump: MonDump = serde_json::from_value(raw).unwrap();
        let addrs: Vec<String> = dump.addresses().iter().map(ToString::to_string).collect();

        assert_eq!(addrs, vec!["10.0.0.1:6789", "10.0.0.2:6789"]);
    }
}
