//! Daily maintenance window.

use std::time::Duration;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};

use crate::config::MaintenanceConfig;

/// A fixed UTC time of day at which per-cluster maintenance runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceWindow {
    at: NaiveTime,
}

impl MaintenanceWindow {
    /// `None` when hour/minute are out of range.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(|at| Self { at })
    }

    /// `None` when maintenance is disabled or misconfigured.
    pub fn from_config(config: &MaintenanceConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        Self::new(config.hour, config.minute)
    }

    /// First occurrence of the window strictly after `now`.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive().and_time(self.at).and_utc();
        if today > now {
            today
        } else {
            today + TimeDelta::days(1)
        }
    }

    pub fn delay_until_next(&self, now: DateTime<Utc>) -> Duration {
        (self.next_run_after(now) - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for MaintenanceWindow {
    fn default() -> Self {
        Self {
            at: NaiveTime::MIN,
        }
    }
}
