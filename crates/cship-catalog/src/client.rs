//! Catalog service HTTP client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use cship_models::SourceVideoId;

use crate::error::{CatalogError, CatalogResult};
use crate::types::{ClipSuggestion, SourceMetadata, SuggestionsResponse};

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog service.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8002".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl CatalogConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("CATALOG_SERVICE_URL").unwrap_or(defaults.base_url),
            timeout: Duration::from_secs(
                std::env::var("CATALOG_SERVICE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

/// Client for the upstream catalog and suggestion endpoints.
pub struct CatalogClient {
    http: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a new catalog client.
    pub fn new(config: CatalogConfig) -> CatalogResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(CatalogError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> CatalogResult<Self> {
        Self::new(CatalogConfig::from_env())
    }

    /// Fetch metadata for a source video.
    pub async fn video_metadata(&self, id: &SourceVideoId) -> CatalogResult<SourceMetadata> {
        let url = format!("{}/videos/{}", self.config.base_url, id);

        debug!(video_id = %id, "Fetching source metadata");

        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::RequestFailed(format!(
                "Catalog returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))
    }

    /// Fetch AI-suggested candidate clips for a source video.
    pub async fn suggest_clips(&self, id: &SourceVideoId) -> CatalogResult<Vec<ClipSuggestion>> {
        let url = format!("{}/videos/{}/suggestions", self.config.base_url, id);

        debug!(video_id = %id, "Requesting clip suggestions");

        let response = self.http.post(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::RequestFailed(format!(
                "Suggestion service returned {}: {}",
                status, body
            )));
        }

        let listing: SuggestionsResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

        Ok(listing.suggestions)
    }
}
