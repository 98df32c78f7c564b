use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub hosts: Vec<String>,
    pub key: String,
}

/// A cluster as reported by the monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterView {
    pub id: String,
    pub name: String,
    /// One of `unknown`, `ok`, `warning`, `error`.
    pub status: String,
    pub is_stable: bool,
    pub detail: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct MonitorClient {
    client: Client,
    base_url: String,
}

impl MonitorClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Register a cluster. Fails with the server's message on any non-201 reply.
    pub async fn register_cluster(
        &self,
        name: &str,
        hosts: &[&str],
        key: &str,
    ) -> Result<ClusterView, Box<dyn std::error::Error>> {
        let req = RegisterRequest {
            name: name.to_string(),
            hosts: hosts.iter().map(|h| h.to_string()).collect(),
            key: key.to_string(),
        };
        let resp = self
            .client
            .post(format!("{}/clusters", self.base_url))
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if status != StatusCode::CREATED {
            return Err(error_message(status, &text).into());
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// All registered clusters; empty when the server answers 204.
    pub async fn list_clusters(&self) -> Result<Vec<ClusterView>, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/clusters", self.base_url))
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(error_message(status, &text).into());
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn error_message(status: StatusCode, text: &str) -> String {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => format!("monitor returned {}: {}", status, body.message),
        Err(_) => format!("monitor returned {}: {}", status, text),
    }
}
