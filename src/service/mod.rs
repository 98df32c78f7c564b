//! Cluster health orchestration.
//!
//! # Data Flow
//! ```text
//! RegisterCluster (HTTP)
//!     → validate into ClusterRecord(status = unknown)
//!     → Probe::health (must succeed)
//!     → set_status → RecordStore::create
//!
//! RefreshCluster (scheduler)
//!     → RecordStore::get → Probe::health (failure ⇒ unknown, null detail)
//!     → set_status → RecordStore::update only when the record changed
//!     → ok / not ok back to the scheduler
//!
//! UpdateMonitors (daily maintenance)
//!     → Probe::monitors → set_addresses → RecordStore::update when changed
//! ```
//!
//! # Design Decisions
//! - Probe failures are fatal for registration, never for refresh
//! - Every probe call carries a deadline
//! - The service never decides when to poll; that belongs to the scheduler

pub mod health;

use thiserror::Error;

use crate::domain::DomainError;
use crate::probe::ProbeError;
use crate::store::StoreError;

pub use health::{ClusterHealthService, ClusterSummary, RegisterCluster};

/// Errors returned by service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidParameter(#[from] DomainError),

    #[error("cluster already exists: {0}")]
    AlreadyExists(String),

    #[error("cluster not found: {0}")]
    NotFound(String),

    #[error("failed to health check: {0}")]
    Transport(#[from] ProbeError),

    #[error("storage failure: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(id) => ServiceError::AlreadyExists(id),
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Store(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
