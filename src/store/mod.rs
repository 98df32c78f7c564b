//! Cluster record persistence.
//!
//! # Data Flow
//! ```text
//! ClusterHealthService
//!     → RecordStore trait (create / get / list / update)
//!         → memory.rs (DashMap, process lifetime)
//!         → file.rs   (one JSON document per cluster under data_dir)
//! ```
//!
//! # Design Decisions
//! - `create` never overwrites; an existing id is `AlreadyExists`
//! - `update` never creates; a missing id is `NotFound`
//! - `list` is ordered by id, which is time-ordered for generated ids
//! - Stored documents are re-validated through the domain constructor on load

pub mod file;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ClusterRecord, DomainError};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors surfaced by record stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cluster already exists: {0}")]
    AlreadyExists(String),

    #[error("cluster not found: {0}")]
    NotFound(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode cluster record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("stored cluster {id} is invalid: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: DomainError,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value store holding one record per monitored cluster.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record. Fails with `AlreadyExists` on id collision.
    async fn create(&self, record: &ClusterRecord) -> StoreResult<()>;

    /// Load a record by id. Fails with `NotFound`.
    async fn get(&self, id: &str) -> StoreResult<ClusterRecord>;

    /// All records, ordered by id.
    async fn list(&self) -> StoreResult<Vec<ClusterRecord>>;

    /// Replace an existing record. Fails with `NotFound`.
    async fn update(&self, record: &ClusterRecord) -> StoreResult<()>;
}
