//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → store → probe → service → scheduler → resume stored clusters
//!
//! Shutdown (shutdown.rs):
//!     Signal received → HTTP stops accepting → scheduler drains → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: an unreadable data directory aborts startup
//! - Shutdown has a deadline; scheduler tasks still running after it are aborted

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use signals::shutdown_signal;
pub use startup::{build_store, Runtime};
