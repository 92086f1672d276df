//! Pool manager reached over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::{OrchestratorError, PoolManager};
use crate::domain::PoolKey;

/// Body of `POST {base_url}/pools/{pool_id}/dynamic-fee`.
#[derive(Debug, Serialize)]
struct DynamicFeeRequest<'a> {
    pool_key: &'a PoolKey,
    fee: u32,
}

/// Forwards fee updates to a remote pool manager.
#[derive(Debug, Clone)]
pub struct HttpPoolManager {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPoolManager {
    /// Creates a client for the pool manager at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::Transport`] if the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, OrchestratorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OrchestratorError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl PoolManager for HttpPoolManager {
    async fn update_dynamic_lp_fee(&self, key: &PoolKey, fee: u32) -> Result<(), OrchestratorError> {
        let url = format!("{}/pools/{}/dynamic-fee", self.base_url, key.to_id());
        let response = self
            .client
            .post(&url)
            .json(&DynamicFeeRequest { pool_key: key, fee })
            .send()
            .await
            .map_err(|e| OrchestratorError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        tracing::warn!(%url, status = status.as_u16(), "pool manager rejected fee update");
        Err(OrchestratorError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
