//! Per-cluster adaptive polling.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};

use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::scheduler::{LevelIntervals, MaintenanceWindow, PollLevel};
use crate::service::{ClusterHealthService, ServiceResult};

/// Jobs owned by one watched cluster.
struct JobSlot {
    level: PollLevel,
    tasks: Vec<JoinHandle<()>>,
}

struct Inner {
    service: Arc<ClusterHealthService>,
    intervals: LevelIntervals,
    maintenance: Option<MaintenanceWindow>,
    jobs: DashMap<String, JobSlot>,
    shutdown: Shutdown,
}

/// Drives refresh and monitor maintenance for every watched cluster.
///
/// Each cluster gets a poll loop whose delay follows its [`PollLevel`], and
/// optionally a daily maintenance loop. Both loops share a per-cluster gate
/// so their store writes never interleave.
#[derive(Clone)]
pub struct AdaptiveScheduler {
    inner: Arc<Inner>,
}

impl AdaptiveScheduler {
    pub fn new(
        service: Arc<ClusterHealthService>,
        intervals: LevelIntervals,
        maintenance: Option<MaintenanceWindow>,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                service,
                intervals,
                maintenance,
                jobs: DashMap::new(),
                shutdown,
            }),
        }
    }

    /// Start polling a cluster at the most urgent level.
    ///
    /// Returns false when the cluster is already watched or shutdown has begun.
    pub fn watch(&self, cluster_id: &str) -> bool {
        if self.inner.shutdown.is_triggered() {
            tracing::warn!(cluster_id = %cluster_id, "Scheduler is shutting down, not watching cluster");
            return false;
        }

        let initial = self.inner.intervals.initial_level();
        match self.inner.jobs.entry(cluster_id.to_string()) {
            Entry::Occupied(_) => {
                tracing::debug!(cluster_id = %cluster_id, "Cluster already watched");
                return false;
            }
            Entry::Vacant(slot) => {
                slot.insert(JobSlot {
                    level: initial,
                    tasks: Vec::new(),
                });
            }
        }

        let gate = Arc::new(Mutex::new(()));
        let mut tasks = vec![tokio::spawn(poll_loop(
            Arc::clone(&self.inner),
            cluster_id.to_string(),
            Arc::clone(&gate),
        ))];
        if let Some(window) = self.inner.maintenance {
            tasks.push(tokio::spawn(maintenance_loop(
                Arc::clone(&self.inner),
                cluster_id.to_string(),
                window,
                gate,
            )));
        }
        if let Some(mut slot) = self.inner.jobs.get_mut(cluster_id) {
            slot.tasks = tasks;
        }

        metrics::record_poll_level(cluster_id, initial.value());
        tracing::info!(
            cluster_id = %cluster_id,
            level = initial.value(),
            maintenance = self.inner.maintenance.is_some(),
            "Watching cluster"
        );
        true
    }

    /// Watch every cluster already in the store. Returns how many were started.
    pub async fn resume_all(&self) -> ServiceResult<usize> {
        let clusters = self.inner.service.list_clusters(Utc::now()).await?;
        let started = clusters.iter().filter(|c| self.watch(&c.id)).count();
        tracing::info!(
            stored = clusters.len(),
            started,
            "Resumed polling for stored clusters"
        );
        Ok(started)
    }

    pub fn poll_level(&self, cluster_id: &str) -> Option<PollLevel> {
        self.inner.jobs.get(cluster_id).map(|slot| slot.level)
    }

    /// Watched cluster ids, sorted.
    pub fn watched(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.jobs.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Stop all loops. In-flight work gets `drain` to finish, then is aborted.
    pub async fn shutdown(&self, drain: Duration) {
        self.inner.shutdown.trigger();

        let handles: Vec<JoinHandle<()>> = self
            .inner
            .jobs
            .iter_mut()
            .flat_map(|mut slot| std::mem::take(&mut slot.tasks))
            .collect();
        let aborts: Vec<AbortHandle> = handles.iter().map(JoinHandle::abort_handle).collect();
        let count = handles.len();

        let drained = tokio::time::timeout(drain, async move {
            for handle in handles {
                if let Err(e) = handle.await {
                    if e.is_panic() {
                        tracing::error!(error = %e, "Scheduler task panicked");
                    }
                }
            }
        })
        .await;

        match drained {
            Ok(()) => tracing::info!(tasks = count, "Scheduler drained"),
            Err(_) => {
                tracing::warn!(
                    tasks = count,
                    drain_secs = drain.as_secs(),
                    "Scheduler drain timed out, aborting remaining tasks"
                );
                for abort in aborts {
                    abort.abort();
                }
            }
        }
    }
}

impl Inner {
    /// One refresh cycle. Returns the delay before the next one.
    async fn poll_once(&self, cluster_id: &str) -> Duration {
        match self.service.refresh_cluster(cluster_id, Utc::now()).await {
            Ok(healthy) => {
                let level = self.advance(cluster_id, healthy);
                metrics::record_poll_level(cluster_id, level.value());
                tracing::debug!(
                    cluster_id = %cluster_id,
                    healthy,
                    level = level.value(),
                    "Poll complete"
                );
                self.intervals.interval_for(level)
            }
            Err(e) => {
                metrics::record_refresh_failure();
                let level = self.level(cluster_id);
                tracing::warn!(
                    cluster_id = %cluster_id,
                    error = %e,
                    level = level.value(),
                    "Refresh failed, keeping poll level"
                );
                self.intervals.interval_for(level)
            }
        }
    }

    fn advance(&self, cluster_id: &str, healthy: bool) -> PollLevel {
        match self.jobs.get_mut(cluster_id) {
            Some(mut slot) => {
                slot.level = slot.level.after_poll(healthy);
                slot.level
            }
            None => self.intervals.initial_level().after_poll(healthy),
        }
    }

    fn level(&self, cluster_id: &str) -> PollLevel {
        self.jobs
            .get(cluster_id)
            .map(|slot| slot.level)
            .unwrap_or_else(|| self.intervals.initial_level())
    }
}

async fn poll_loop(inner: Arc<Inner>, cluster_id: String, gate: Arc<Mutex<()>>) {
    let mut shutdown = inner.shutdown.subscribe();
    while !inner.shutdown.is_triggered() {
        let delay = {
            let _turn = gate.lock().await;
            inner.poll_once(&cluster_id).await
        };

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.recv() => break,
        }
    }
    tracing::debug!(cluster_id = %cluster_id, "Poll loop stopped");
}

async fn maintenance_loop(
    inner: Arc<Inner>,
    cluster_id: String,
    window: MaintenanceWindow,
    gate: Arc<Mutex<()>>,
) {
    let mut shutdown = inner.shutdown.subscribe();
    while !inner.shutdown.is_triggered() {
        {
            let _turn = gate.lock().await;
            match inner.service.update_monitors(&cluster_id).await {
                Ok(changed) => {
                    tracing::debug!(cluster_id = %cluster_id, changed, "Monitor maintenance complete")
                }
                Err(e) => {
                    tracing::warn!(cluster_id = %cluster_id, error = %e, "Monitor maintenance failed")
                }
            }
        }

        let delay = window.delay_until_next(Utc::now());
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.recv() => break,
        }
    }
    tracing::debug!(cluster_id = %cluster_id, "Maintenance loop stopped");
}
