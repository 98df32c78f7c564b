//! Stability policy.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::cluster::ClusterRecord;

/// How long a cluster must stay healthy before it is reported stable.
pub const DEFAULT_STABILITY_WINDOW: Duration = Duration::from_secs(3 * 60);

/// True once `now` is at least `window` past the record's last bad observation.
///
/// Presentation only; scheduling never consults it.
pub fn is_cluster_stable(record: &ClusterRecord, now: DateTime<Utc>, window: Duration) -> bool {
    let window = TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX);
    match record.last_bad_time().checked_add_signed(window) {
        Some(stable_at) => now >= stable_at,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, ClusterStatus};
    use serde_json::Value;

    fn record_bad_at(at: DateTime<Utc>) -> ClusterRecord {
        ClusterRecord::new(
            "id",
            "c1",
            Address::parse_all(&["10.0.0.1:6789"]).unwrap(),
            "k",
            ClusterStatus::Error,
            at,
            Value::Null,
        )
        .unwrap()
    }

    #[test]
    fn unstable_right_after_failure() {
        let now = Utc::now();
        assert!(!is_cluster_stable(&record_bad_at(now), now, DEFAULT_STABILITY_WINDOW));
    }

    #[test]
    fn becomes_stable_exactly_at_window_end() {
        let bad = Utc::now();
        let rec = record_bad_at(bad);
        let window = DEFAULT_STABILITY_WINDOW;
        let edge = bad + TimeDelta::from_std(window).unwrap();

        assert!(!is_cluster_stable(&rec, edge - TimeDelta::milliseconds(1), window));
        assert!(is_cluster_stable(&rec, edge, window));
        assert!(is_cluster_stable(&rec, edge + TimeDelta::hours(1), window));
    }

    #[test]
    fn epoch_last_bad_time_is_stable() {
        let rec = record_bad_at(DateTime::<Utc>::UNIX_EPOCH);
        assert!(is_cluster_stable(&rec, Utc::now(), DEFAULT_STABILITY_WINDOW));
    }
}
