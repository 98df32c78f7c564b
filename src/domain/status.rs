//! Simplified cluster health status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Health status derived from the most recent probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStatus {
    Unknown,
    Ok,
    Warning,
    Error,
}

impl ClusterStatus {
    /// Only `Ok` counts as healthy; everything else stamps a new last-bad time.
    pub fn is_healthy(self) -> bool {
        self == ClusterStatus::Ok
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClusterStatus::Unknown => "unknown",
            ClusterStatus::Ok => "ok",
            ClusterStatus::Warning => "warning",
            ClusterStatus::Error => "error",
        }
    }

    /// Numeric form used by the status gauge.
    pub fn as_gauge(self) -> f64 {
        match self {
            ClusterStatus::Unknown => 0.0,
            ClusterStatus::Ok => 1.0,
            ClusterStatus::Warning => 2.0,
            ClusterStatus::Error => 3.0,
        }
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClusterStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(ClusterStatus::Unknown),
            "ok" => Ok(ClusterStatus::Ok),
            "warning" => Ok(ClusterStatus::Warning),
            "error" => Ok(ClusterStatus::Error),
            _ => Err(DomainError::InvalidParameter("status")),
        }
    }
}
