//! Adaptive health monitoring for Ceph clusters.

// Core model
pub mod domain;
pub mod ids;

// Collaborators
pub mod probe;
pub mod store;

// Orchestration
pub mod scheduler;
pub mod service;

// Surfaces and cross-cutting concerns
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::MonitorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use scheduler::AdaptiveScheduler;
pub use service::ClusterHealthService;
