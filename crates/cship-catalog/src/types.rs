//! Catalog request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cship_models::{format_seconds, ClipRequest, SourceVideoId};

/// Thumbnail URL variants for a source video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxres: Option<String>,
}

impl Thumbnails {
    /// The largest available thumbnail.
    pub fn best(&self) -> Option<&str> {
        self.maxres
            .as_deref()
            .or(self.standard.as_deref())
            .or(self.high.as_deref())
            .or(self.medium.as_deref())
            .or(self.default.as_deref())
    }
}

/// Source video metadata from the upstream catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub video_id: SourceVideoId,
    pub title: String,
    pub channel_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    /// Total video duration in seconds.
    pub duration_seconds: f64,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SourceMetadata {
    /// Duration formatted as `HH:MM:SS` for display.
    pub fn duration_formatted(&self) -> String {
        format_seconds(self.duration_seconds)
    }
}

/// A candidate clip suggested by transcript analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSuggestion {
    pub title: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    /// Estimated shareability, 0-100.
    pub virality_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl ClipSuggestion {
    /// Bridge a suggestion into an export request for the given source.
    pub fn into_clip_request(self, source: SourceVideoId) -> ClipRequest {
        ClipRequest::new(source, self.start_seconds, self.end_seconds, self.title)
    }
}

/// Suggestion listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SuggestionsResponse {
    pub suggestions: Vec<ClipSuggestion>,
}
