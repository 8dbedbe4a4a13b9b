//! Render engine HTTP client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use cship_models::{CompositionDescriptor, OutputSpec};

use crate::error::{DispatchError, StatusError};
use crate::types::{RenderHandle, RenderSubmission, StatusReport};

/// Configuration for the engine client.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the render engine API.
    pub base_url: String,
    /// Bearer token for the engine.
    pub api_key: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.creatomate.com/v2".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("RENDER_ENGINE_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("RENDER_ENGINE_API_KEY").unwrap_or_default(),
            timeout: Duration::from_secs(
                std::env::var("RENDER_ENGINE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

/// HTTP client for the external render engine.
pub struct EngineClient {
    http: Client,
    config: EngineConfig,
}

impl EngineClient {
    /// Create a new engine client.
    pub fn new(config: EngineConfig) -> Result<Self, DispatchError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(DispatchError::Transport)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, DispatchError> {
        Self::new(EngineConfig::from_env())
    }

    /// Submit a composition for rendering.
    ///
    /// The engine answers with a non-empty array of accepted renders; an
    /// empty or malformed array means it could not accept the source and is
    /// reported as [`DispatchError::Rejected`].
    pub async fn submit(
        &self,
        descriptor: &CompositionDescriptor,
        output: &OutputSpec,
    ) -> Result<RenderHandle, DispatchError> {
        let url = format!("{}/renders", self.config.base_url);
        let body = RenderSubmission::new(descriptor, output);

        debug!(elements = body.elements.len(), "Submitting composition to {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(DispatchError::Transport)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(DispatchError::Unauthorized);
        }
        if status.is_client_error() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected(format!(
                "Engine returned {}: {}",
                status, detail
            )));
        }
        let response = response.error_for_status().map_err(DispatchError::Transport)?;

        let handles: Vec<RenderHandle> = response
            .json()
            .await
            .map_err(|e| DispatchError::Rejected(format!("Malformed submit response: {}", e)))?;

        handles
            .into_iter()
            .next()
            .ok_or_else(|| DispatchError::Rejected("Engine accepted no renders".to_string()))
    }

    /// Check the status of a previously submitted render.
    ///
    /// Every failure here is transient; the caller retries on its next poll
    /// tick.
    pub async fn check_status(&self, job_id: &str) -> Result<StatusReport, StatusError> {
        let url = format!("{}/renders/{}", self.config.base_url, job_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(StatusError::Transport)?
            .error_for_status()
            .map_err(StatusError::Transport)?;

        response
            .json()
            .await
            .map_err(|e| StatusError::InvalidResponse(e.to_string()))
    }
}
