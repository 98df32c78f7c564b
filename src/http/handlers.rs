//! Cluster API handlers.

use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::service::RegisterCluster;

/// Body of `POST /clusters`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterClusterRequest {
    pub name: String,
    #[serde(default)]
    pub hosts: Vec<String>,
    pub key: String,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

fn failure(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            message: message.into(),
        }),
    )
        .into_response()
}

/// Answer `500 {message}` when a request outlives `deadline`.
pub async fn enforce_deadline(
    State(deadline): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    match tokio::time::timeout(deadline, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(path = %path, timeout_secs = deadline.as_secs(), "Request timed out");
            failure(format!(
                "request timed out after {} seconds",
                deadline.as_secs()
            ))
        }
    }
}

/// `POST /clusters`: probe, persist and start watching a new cluster.
pub async fn register_cluster(
    State(state): State<AppState>,
    payload: Result<Json<RegisterClusterRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected register request body");
            return failure(rejection.body_text());
        }
    };

    let request = RegisterCluster {
        name: body.name,
        hosts: body.hosts,
        key: body.key,
        now: Utc::now(),
    };

    match state.service.register_cluster(request).await {
        Ok(summary) => {
            state.scheduler.watch(&summary.id);
            (StatusCode::CREATED, Json(summary)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Cluster registration failed");
            failure(e.to_string())
        }
    }
}

/// `GET /clusters`: 200 with every cluster, or 204 when there are none.
pub async fn list_clusters(State(state): State<AppState>) -> Response {
    match state.service.list_clusters(Utc::now()).await {
        Ok(clusters) if clusters.is_empty() => StatusCode::NO_CONTENT.into_response(),
        Ok(clusters) => Json(clusters).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list clusters");
            failure(e.to_string())
        }
    }
}
