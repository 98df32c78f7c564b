//! Structured logging.
//!
//! # Design Decisions
//! - RUST_LOG wins over the configured level when set
//! - Initialization is idempotent so tests and binaries can share it

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directive for a configured level, e.g. `info`.
pub fn default_directive(level: &str) -> String {
    format!("cluster_monitor={level},tower_http={level}")
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(level).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
