//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! service / scheduler / http produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (probe counters, per-cluster gauges)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Cluster id is a label on per-cluster gauges, never in metric names
//! - Recording is a no-op until a recorder is installed, so tests need no setup

pub mod logging;
pub mod metrics;
