//! Cluster domain model.
//!
//! # Data Flow
//! ```text
//! Registration request (name, hosts, key)
//!     → address.rs (parse and validate every host:port)
//!     → cluster.rs (ClusterRecord::new validates the whole record)
//!
//! Probe result (status, detail, now)
//!     → cluster.rs (set_status: monotonic, copy-on-write transition)
//!     → Cow::Borrowed when nothing changed, Cow::Owned otherwise
//!
//! Presentation
//!     → stability.rs (is_cluster_stable: pure function of last_bad_time and now)
//! ```
//!
//! # Design Decisions
//! - Records are values; every mutation yields a new record
//! - Validation happens in one place, the constructor, and is re-run after mutation
//! - The diagnostic detail is an opaque JSON tree owned by the probe

pub mod address;
pub mod cluster;
pub mod error;
pub mod stability;
pub mod status;

pub use address::Address;
pub use cluster::ClusterRecord;
pub use error::DomainError;
pub use stability::{is_cluster_stable, DEFAULT_STABILITY_WINDOW};
pub use status::ClusterStatus;
