//! Clip export requests.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::SourceVideoId;

/// A request to export one time range of a source video.
///
/// Invariant: `0 <= start_seconds < end_seconds`. The range is validated by
/// the export surface before any dispatch call; a request that fails
/// validation never produces a render job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipRequest {
    /// Source video in the upstream catalog.
    pub source: SourceVideoId,

    /// Clip start offset within the source video, in seconds.
    pub start_seconds: f64,

    /// Clip end offset within the source video, in seconds.
    pub end_seconds: f64,

    /// Title overlaid on the clip. Empty disables the title layer.
    pub title: String,

    /// Whether to burn auto-generated captions into the clip.
    pub captions_enabled: bool,
}

impl ClipRequest {
    /// Create a new clip request. Captions default to enabled.
    pub fn new(
        source: SourceVideoId,
        start_seconds: f64,
        end_seconds: f64,
        title: impl Into<String>,
    ) -> Self {
        Self {
            source,
            start_seconds,
            end_seconds,
            title: title.into(),
            captions_enabled: true,
        }
    }

    /// Set the captions flag.
    pub fn with_captions(mut self, enabled: bool) -> Self {
        self.captions_enabled = enabled;
        self
    }

    /// Check the time-range invariant.
    pub fn validate(&self) -> Result<(), ClipValidationError> {
        if self.start_seconds < 0.0 || !self.start_seconds.is_finite() {
            return Err(ClipValidationError::NegativeStart(self.start_seconds));
        }
        if !self.end_seconds.is_finite() || self.start_seconds >= self.end_seconds {
            return Err(ClipValidationError::StartNotBeforeEnd {
                start: self.start_seconds,
                end: self.end_seconds,
            });
        }
        Ok(())
    }

    /// Clip duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        (self.end_seconds - self.start_seconds).max(0.0)
    }
}

/// Clip request validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClipValidationError {
    #[error("Clip start must not be negative (got {0})")]
    NegativeStart(f64),

    #[error("Clip start ({start}) must be before end ({end})")]
    StartNotBeforeEnd { start: f64, end: f64 },
}

/// Format a duration in seconds as `HH:MM:SS` (or `HH:MM:SS.mmm` when a
/// fractional part is present).
pub fn format_seconds(total_secs: f64) -> String {
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;

    if (secs - secs.floor()).abs() > 0.0001 {
        format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs.floor() as u32)
    }
}
