//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, clock fields in range)
//! - Validate addresses parse before anything binds
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{MonitorConfig, StorageBackend};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be > 0"));
    }

    let polling = &config.polling;
    if config.listener.request_timeout_secs <= polling.probe_timeout_secs {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            format!(
                "must exceed polling.probe_timeout_secs ({})",
                polling.probe_timeout_secs
            ),
        ));
    }
    for (field, value) in [
        ("polling.long_interval_secs", polling.long_interval_secs),
        ("polling.medium_interval_secs", polling.medium_interval_secs),
        ("polling.short_interval_secs", polling.short_interval_secs),
        ("polling.probe_timeout_secs", polling.probe_timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be > 0"));
        }
    }
    if polling.long_interval_secs < polling.medium_interval_secs
        || polling.medium_interval_secs < polling.short_interval_secs
    {
        errors.push(ValidationError::new(
            "polling",
            "intervals must satisfy long >= medium >= short",
        ));
    }

    if config.maintenance.hour > 23 {
        errors.push(ValidationError::new("maintenance.hour", "must be in 0..=23"));
    }
    if config.maintenance.minute > 59 {
        errors.push(ValidationError::new("maintenance.minute", "must be in 0..=59"));
    }

    if config.storage.backend == StorageBackend::File && config.storage.data_dir.trim().is_empty() {
        errors.push(ValidationError::new(
            "storage.data_dir",
            "required for the file backend",
        ));
    }

    for (field, value) in [
        ("probe.runtime", &config.probe.runtime),
        ("probe.image", &config.probe.image),
        ("probe.version", &config.probe.version),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
