//! Source video references.
//!
//! The upstream catalog identifies videos by an 11-character id. Users paste
//! full watch-page URLs, so this module accepts both.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Reference to a source video in the upstream catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SourceVideoId(String);

impl SourceVideoId {
    /// Parse a source reference from a bare id or a watch-page URL.
    ///
    /// Accepted URL shapes:
    /// - `https://www.youtube.com/watch?v=VIDEO_ID`
    /// - `https://youtu.be/VIDEO_ID`
    /// - `https://youtube.com/embed/VIDEO_ID`
    /// - `https://youtube.com/shorts/VIDEO_ID`
    pub fn parse(input: &str) -> Result<Self, SourceIdError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SourceIdError::Empty);
        }

        if let Ok(url) = Url::parse(input) {
            return Self::from_url(&url);
        }

        Self::validate_id(input)
    }

    fn from_url(url: &Url) -> Result<Self, SourceIdError> {
        let host = url
            .host_str()
            .ok_or_else(|| SourceIdError::NotAWatchUrl(url.to_string()))?
            .trim_start_matches("www.")
            .to_ascii_lowercase();

        match host.as_str() {
            "youtu.be" => {
                let id = url
                    .path_segments()
                    .and_then(|mut segments| segments.next())
                    .ok_or_else(|| SourceIdError::IdNotFound(url.to_string()))?;
                Self::validate_id(id)
            }
            "youtube.com" | "m.youtube.com" => {
                if let Some((_, id)) = url.query_pairs().find(|(key, _)| key == "v") {
                    return Self::validate_id(&id);
                }
                let segments: Vec<&str> =
                    url.path_segments().map(|s| s.collect()).unwrap_or_default();
                match segments.as_slice() {
                    ["embed", id] | ["shorts", id] | ["v", id] => Self::validate_id(id),
                    _ => Err(SourceIdError::IdNotFound(url.to_string())),
                }
            }
            _ => Err(SourceIdError::NotAWatchUrl(url.to_string())),
        }
    }

    fn validate_id(id: &str) -> Result<Self, SourceIdError> {
        let valid = id.len() == 11
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(id.to_string()))
        } else {
            Err(SourceIdError::InvalidId(id.to_string()))
        }
    }

    /// Get the inner id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch-page URL for this video, used as the render engine's
    /// video layer source.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for SourceVideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source reference parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceIdError {
    #[error("Source reference is empty")]
    Empty,

    #[error("Not a recognized watch URL: {0}")]
    NotAWatchUrl(String),

    #[error("No video id found in URL: {0}")]
    IdNotFound(String),

    #[error("Invalid video id: {0}")]
    InvalidId(String),
}
