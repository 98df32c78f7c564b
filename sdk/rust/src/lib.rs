//! Client for the cluster monitor HTTP API.

pub mod client;

pub use client::{ClusterView, MonitorClient, RegisterRequest};
