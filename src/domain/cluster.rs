//! The monitored cluster record.
//!
//! # State Transitions
//! ```text
//! set_status(status, detail, now):
//!     now < last_bad_time        → InvalidParameter("last_bad_time")
//!     status != Ok               → last_bad_time = now
//!     (status, last_bad, detail) unchanged → Cow::Borrowed(self)
//!     otherwise                  → Cow::Owned(updated clone)
//! ```

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::address::Address;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::status::ClusterStatus;

/// A registered cluster and its latest known health.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterRecord {
    id: String,
    name: String,
    addresses: Vec<Address>,
    key: String,
    status: ClusterStatus,
    last_bad_time: DateTime<Utc>,
    detail: Value,
}

impl ClusterRecord {
    /// Build a validated record.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        addresses: Vec<Address>,
        key: impl Into<String>,
        status: ClusterStatus,
        last_bad_time: DateTime<Utc>,
        detail: Value,
    ) -> DomainResult<Self> {
        let record = Self {
            id: id.into(),
            name: name.into(),
            addresses,
            key: key.into(),
            status,
            last_bad_time,
            detail,
        };
        record.validate()?;
        Ok(record)
    }

    /// Fold a probe result into the record.
    ///
    /// Returns `Cow::Borrowed(self)` when nothing changes, so callers can skip the write.
    pub fn set_status(
        &self,
        status: ClusterStatus,
        detail: Value,
        now: DateTime<Utc>,
    ) -> DomainResult<Cow<'_, Self>> {
        if now < self.last_bad_time {
            return Err(DomainError::InvalidParameter("last_bad_time"));
        }

        let last_bad_time = if status.is_healthy() {
            self.last_bad_time
        } else {
            now
        };

        if self.status == status && self.last_bad_time == last_bad_time && self.detail == detail {
            return Ok(Cow::Borrowed(self));
        }

        let mut updated = self.clone();
        updated.status = status;
        updated.last_bad_time = last_bad_time;
        updated.detail = detail;
        updated.validate()?;

        Ok(Cow::Owned(updated))
    }

    /// Replace the monitor list, e.g. after the daily monitor refresh.
    pub fn set_addresses(&self, addresses: Vec<Address>) -> DomainResult<Cow<'_, Self>> {
        if self.addresses == addresses {
            return Ok(Cow::Borrowed(self));
        }

        let mut updated = self.clone();
        updated.addresses = addresses;
        updated.validate()?;

        Ok(Cow::Owned(updated))
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_healthy()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn status(&self) -> ClusterStatus {
        self.status
    }

    pub fn last_bad_time(&self) -> DateTime<Utc> {
        self.last_bad_time
    }

    pub fn detail(&self) -> &Value {
        &self.detail
    }

    fn validate(&self) -> DomainResult<()> {
        if self.id.is_empty() {
            return Err(DomainError::InvalidParameter("id"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidParameter("name"));
        }
        if self.addresses.is_empty() {
            return Err(DomainError::InvalidParameter("addresses"));
        }
        if self.key.is_empty() {
            return Err(DomainError::InvalidParameter("key"));
        }
        Ok(())
    }
}
