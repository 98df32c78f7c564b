//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request id, trace, timeout, body limit)
//!     → handlers.rs
//!         POST /clusters → ClusterHealthService::register_cluster → AdaptiveScheduler::watch
//!         GET  /clusters → ClusterHealthService::list_clusters
//!     → JSON response (201 / 200 / 204, or 500 {message})
//! ```

pub mod handlers;
pub mod server;

pub use handlers::{ErrorBody, RegisterClusterRequest};
pub use server::{AppState, HttpServer};
