//! Render job registry.

use tracing::debug;

use cship_models::{ClipRequest, Platform, RenderJob, RenderJobId, RenderStatus};

/// A status transition to converge into the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusUpdate {
    /// Intermediate progress report (0-100); the job stays `rendering`.
    Progress(u8),
    /// The engine finished the render.
    Completed { url: Option<String> },
    /// The engine reported failure, or the poll budget ran out.
    Failed { error: Option<String> },
}

/// In-memory collection of render jobs: the single source of truth for job
/// state within one export session.
///
/// Insertion order is preserved. Jobs are never removed individually — only
/// a full session reset clears the registry. All mutation happens on the
/// session's single logical timeline, so the registry itself carries no
/// locking.
#[derive(Debug, Default)]
pub struct RenderJobRegistry {
    jobs: Vec<RenderJob>,
}

impl RenderJobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a job for a submission the engine accepted. Returns its id.
    pub fn create_from_submission(
        &mut self,
        clip: ClipRequest,
        platform: Platform,
        remote_id: impl Into<String>,
    ) -> RenderJobId {
        let job = RenderJob::from_submission(clip, platform, remote_id);
        let id = job.id.clone();
        self.jobs.push(job);
        id
    }

    /// Record a terminal sentinel for a submission that never reached the
    /// engine, keeping the job count equal to the number of attempts.
    pub fn create_failed_sentinel(
        &mut self,
        clip: ClipRequest,
        platform: Platform,
        error: impl Into<String>,
    ) -> RenderJobId {
        let job = RenderJob::failed_submission(clip, platform, error);
        let id = job.id.clone();
        self.jobs.push(job);
        id
    }

    /// Look up a job by id.
    pub fn get(&self, id: &RenderJobId) -> Option<&RenderJob> {
        self.jobs.iter().find(|job| &job.id == id)
    }

    /// All jobs rendering the same source range as `clip`.
    ///
    /// Identity is the (source, start, end) triple; the caption flag and
    /// title do not distinguish clips.
    pub fn jobs_for_clip(&self, clip: &ClipRequest) -> Vec<&RenderJob> {
        self.jobs
            .iter()
            .filter(|job| {
                job.clip.source == clip.source
                    && job.clip.start_seconds == clip.start_seconds
                    && job.clip.end_seconds == clip.end_seconds
            })
            .collect()
    }

    /// All jobs targeting a platform.
    pub fn jobs_for_platform(&self, platform: Platform) -> Vec<&RenderJob> {
        self.jobs
            .iter()
            .filter(|job| job.platform == platform)
            .collect()
    }

    /// Apply a status transition observed for a job.
    ///
    /// Idempotent on terminal jobs: once `completed` or `failed`, a stale
    /// poll response arriving late changes nothing and `None` is returned.
    /// Unknown ids are also a no-op. On success the updated job is returned
    /// as a clone.
    pub fn apply_status_update(
        &mut self,
        id: &RenderJobId,
        update: StatusUpdate,
    ) -> Option<RenderJob> {
        let job = self.jobs.iter_mut().find(|job| &job.id == id)?;

        if job.is_terminal() {
            debug!(job_id = %job.id, "Ignoring status update for terminal job");
            return None;
        }

        match update {
            StatusUpdate::Progress(progress) => job.record_progress(progress),
            StatusUpdate::Completed { url } => job.mark_completed(url),
            StatusUpdate::Failed { error } => job.mark_failed(error),
        }

        Some(job.clone())
    }

    /// Ordered snapshot of every tracked job.
    pub fn snapshot(&self) -> Vec<RenderJob> {
        self.jobs.clone()
    }

    /// Jobs currently in `rendering`, cloned for the poller.
    pub fn rendering_jobs(&self) -> Vec<RenderJob> {
        self.jobs
            .iter()
            .filter(|job| job.status == RenderStatus::Rendering)
            .cloned()
            .collect()
    }

    /// Number of jobs currently in `rendering`.
    pub fn rendering_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|job| job.status == RenderStatus::Rendering)
            .count()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Drop every job. Only a full session reset calls this.
    pub fn clear(&mut self) {
        self.jobs.clear();
    }
}
