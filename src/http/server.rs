//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for the cluster API
//! - Wire up middleware (request id, tracing, timeout, body limit)
//! - Keep every failure, including limits and timeouts, in the `{message}` shape
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, middleware, routing::post, Router};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ListenerConfig;
use crate::http::handlers;
use crate::lifecycle::ShutdownSignal;
use crate::scheduler::AdaptiveScheduler;
use crate::service::ClusterHealthService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ClusterHealthService>,
    pub scheduler: AdaptiveScheduler,
}

/// HTTP server for the cluster API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ListenerConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The body limit is enforced by the extractor and the deadline by
    /// [`handlers::enforce_deadline`], so both surface as handler failures.
    fn build_router(config: &ListenerConfig, state: AppState) -> Router {
        let deadline = Duration::from_secs(config.request_timeout_secs);
        Router::new()
            .route(
                "/clusters",
                post(handlers::register_cluster).get(handlers::list_clusters),
            )
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.max_body_bytes))
            .layer(middleware::from_fn_with_state(
                deadline,
                handlers::enforce_deadline,
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on the given listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.recv().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
