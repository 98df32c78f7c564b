//! Adaptive polling subsystem.
//!
//! # Data Flow
//! ```text
//! watch(cluster_id)
//!     → poll loop:        refresh_cluster → PollLevel up/down → sleep(interval[level])
//!     → maintenance loop: update_monitors → sleep until next daily window (UTC)
//!
//! level.rs:       PollLevel (bounded counter) + LevelIntervals (level → delay)
//! maintenance.rs: MaintenanceWindow (time of day → next delay)
//! adaptive.rs:    AdaptiveScheduler (per-cluster tasks, shutdown drain)
//! ```
//!
//! # Design Decisions
//! - Each poll is one-shot: the next delay is chosen after the previous run
//!   completes, so polls of one cluster never overlap
//! - Higher level = more urgent = shorter interval; new clusters start at max
//! - A failed refresh leaves the level where it was
//! - The scheduler owns its tasks; shutdown waits for in-flight work, then aborts

pub mod adaptive;
pub mod level;
pub mod maintenance;

pub use adaptive::AdaptiveScheduler;
pub use level::{LevelIntervals, PollLevel};
pub use maintenance::MaintenanceWindow;
