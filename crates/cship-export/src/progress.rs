//! Batch progress aggregation.
//!
//! Pure derivations over a registry snapshot. Nothing here is cached:
//! presentation recomputes on every observed change, so the aggregate can
//! never go stale relative to the registry.

use serde::{Deserialize, Serialize};

use cship_models::{Platform, RenderJob, RenderJobId, RenderStatus};

/// A completed render with a downloadable result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedRender {
    pub job_id: RenderJobId,
    pub platform: Platform,
    pub url: String,
}

/// Aggregated view over one registry snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchProgress {
    /// Mean progress over all tracked jobs, 0 when none are tracked.
    pub overall_progress: f64,

    /// Jobs that completed with a result URL, in registry order.
    pub completed: Vec<CompletedRender>,

    /// Number of jobs still rendering.
    pub rendering_count: usize,

    /// Number of failed jobs.
    pub failed_count: usize,

    /// Total number of tracked jobs.
    pub total: usize,
}

impl BatchProgress {
    /// Derive the aggregate from a registry snapshot.
    pub fn from_snapshot(jobs: &[RenderJob]) -> Self {
        let total = jobs.len();

        let overall_progress = if total == 0 {
            0.0
        } else {
            jobs.iter().map(|job| f64::from(job.progress)).sum::<f64>() / total as f64
        };

        let completed = jobs
            .iter()
            .filter(|job| job.status == RenderStatus::Completed)
            .filter_map(|job| {
                job.result_url.as_ref().map(|url| CompletedRender {
                    job_id: job.id.clone(),
                    platform: job.platform,
                    url: url.clone(),
                })
            })
            .collect();

        let rendering_count = jobs
            .iter()
            .filter(|job| job.status == RenderStatus::Rendering)
            .count();

        let failed_count = jobs
            .iter()
            .filter(|job| job.status == RenderStatus::Failed)
            .count();

        Self {
            overall_progress,
            completed,
            rendering_count,
            failed_count,
            total,
        }
    }

    /// Whether every tracked job has reached a terminal state.
    pub fn is_settled(&self) -> bool {
        self.rendering_count == 0
    }
}
