//! Render job entity and lifecycle.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{ClipRequest, Platform};

/// Identifier for a render job.
///
/// Engine-assigned ids and locally-synthesized ids live in disjoint
/// namespaces: a sentinel created for a failed dispatch can never collide
/// with a real engine id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RenderJobId {
    /// Assigned by the render engine once a submission is accepted.
    Remote(String),
    /// Synthesized locally for a submission the engine never accepted.
    Local(Uuid),
}

impl RenderJobId {
    /// Wrap an engine-assigned id.
    pub fn remote(id: impl Into<String>) -> Self {
        Self::Remote(id.into())
    }

    /// Synthesize a fresh local id.
    pub fn local() -> Self {
        Self::Local(Uuid::new_v4())
    }

    /// The engine-side id, if this job was ever accepted by the engine.
    pub fn as_remote(&self) -> Option<&str> {
        match self {
            RenderJobId::Remote(id) => Some(id),
            RenderJobId::Local(_) => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, RenderJobId::Local(_))
    }
}

impl fmt::Display for RenderJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderJobId::Remote(id) => write!(f, "{}", id),
            RenderJobId::Local(uuid) => write!(f, "local-{}", uuid),
        }
    }
}

/// Lifecycle state of a render job.
///
/// `Rendering` is the only state that transitions further; `Completed` and
/// `Failed` are absorbing. A job is materialized already in `Rendering` (or
/// directly in `Failed` when dispatch itself fails) — there is no observable
/// idle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RenderStatus {
    /// The engine is working on the job.
    Rendering,
    /// The engine produced an output file.
    Completed,
    /// Dispatch failed, the engine reported failure, or the poll budget ran out.
    Failed,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::Rendering => "rendering",
            RenderStatus::Completed => "completed",
            RenderStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, RenderStatus::Completed | RenderStatus::Failed)
    }
}

impl fmt::Display for RenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked render request for one (clip, platform) pair.
///
/// Owned exclusively by the job registry for its whole lifetime; everything
/// outside the orchestration core only ever sees cloned snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderJob {
    /// Job identifier (engine-assigned or local sentinel).
    pub id: RenderJobId,

    /// The clip this job renders.
    pub clip: ClipRequest,

    /// Destination platform.
    pub platform: Platform,

    /// Lifecycle state.
    pub status: RenderStatus,

    /// Render progress percentage (0-100).
    pub progress: u8,

    /// Download URL of the rendered file, set on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,

    /// Failure detail, set when the job fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl RenderJob {
    /// Create a job for a submission the engine accepted.
    pub fn from_submission(
        clip: ClipRequest,
        platform: Platform,
        remote_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RenderJobId::remote(remote_id),
            clip,
            platform,
            status: RenderStatus::Rendering,
            progress: 0,
            result_url: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a terminal sentinel for a submission that never reached the
    /// engine. Keeps batch accounting complete: one job per attempt.
    pub fn failed_submission(
        clip: ClipRequest,
        platform: Platform,
        error: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RenderJobId::local(),
            clip,
            platform,
            status: RenderStatus::Failed,
            progress: 0,
            result_url: None,
            error_message: Some(error.into()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Record an intermediate progress report. The job stays `Rendering`.
    pub fn record_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
        self.updated_at = Utc::now();
    }

    /// Transition to `Completed`, carrying the output URL when the engine
    /// supplied one.
    pub fn mark_completed(&mut self, url: Option<String>) {
        self.status = RenderStatus::Completed;
        self.progress = 100;
        self.result_url = url;
        self.updated_at = Utc::now();
    }

    /// Transition to `Failed`. Progress resets to 0.
    pub fn mark_failed(&mut self, error: Option<String>) {
        self.status = RenderStatus::Failed;
        self.progress = 0;
        self.error_message = error;
        self.updated_at = Utc::now();
    }
}
