//! Remote cluster-gateway provisioning over HTTP.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::config::GatewayOptions;
use crate::error::{ClusterError, Result};

/// Adaptive scaling keeps at least this many workers alive.
const MIN_ADAPTIVE_WORKERS: usize = 2;

/// Handle over a cluster created through the gateway API.
pub struct GatewayCluster {
    name: String,
    workers: usize,
}

#[derive(Debug, Deserialize)]
struct ClusterCreated {
    name: String,
}

pub(crate) fn adapt_body(workers: usize) -> serde_json::Value {
    serde_json::json!({
        "minimum": MIN_ADAPTIVE_WORKERS,
        "maximum": workers,
    })
}

impl GatewayCluster {
    /// Creates a cluster through the gateway, then turns on adaptive
    /// scaling between the fixed floor and the requested maximum.
    #[instrument(skip(options), fields(base_url = %options.base_url))]
    pub async fn connect(workers: usize, options: &GatewayOptions) -> Result<Self> {
        if workers == 0 {
            return Err(ClusterError::invalid_config(
                "gateway cluster needs at least one worker",
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ClusterError::gateway(format!("could not build HTTP client: {}", e)))?;

        let base = options.base_url.trim_end_matches('/');
        let create_url = format!("{}/api/v1/clusters", base);
        let mut request = client.post(&create_url).json(&serde_json::json!({}));
        if let Some(token) = &options.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| {
            ClusterError::gateway(format!("create request to {} failed: {}", create_url, e))
        })?;
        if !response.status().is_success() {
            return Err(ClusterError::gateway(format!(
                "cluster create returned {}",
                response.status()
            )));
        }
        let created: ClusterCreated = response
            .json()
            .await
            .map_err(|e| ClusterError::gateway(format!("invalid create response: {}", e)))?;

        let adapt_url = format!("{}/api/v1/clusters/{}/adapt", base, created.name);
        let mut request = client.post(&adapt_url).json(&adapt_body(workers));
        if let Some(token) = &options.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| {
            ClusterError::gateway(format!("adapt request to {} failed: {}", adapt_url, e))
        })?;
        if !response.status().is_success() {
            return Err(ClusterError::gateway(format!(
                "adaptive scaling returned {}",
                response.status()
            )));
        }

        info!(
            "gateway cluster {} scaling adaptively between {} and {} workers",
            created.name, MIN_ADAPTIVE_WORKERS, workers
        );
        Ok(Self {
            name: created.name,
            workers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}
