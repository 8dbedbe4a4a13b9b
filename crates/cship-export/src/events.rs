//! Export session events.

use serde::{Deserialize, Serialize};

use cship_models::{Platform, RenderJobId};

/// One-shot notifications published by an export session.
///
/// These mirror what a presentation surface would toast or badge. The
/// registry remains the source of truth: a dropped or unobserved event never
/// affects job state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExportEvent {
    /// The engine accepted a submission and started rendering.
    RenderStarted {
        job_id: RenderJobId,
        platform: Platform,
    },

    /// A submission never reached the engine; a terminal sentinel job was
    /// recorded in its place.
    SubmissionFailed {
        job_id: RenderJobId,
        platform: Platform,
        message: String,
    },

    /// A job reached `completed`.
    JobCompleted {
        job_id: RenderJobId,
        platform: Platform,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },

    /// A job reached `failed` after being accepted by the engine.
    JobFailed {
        job_id: RenderJobId,
        platform: Platform,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}
