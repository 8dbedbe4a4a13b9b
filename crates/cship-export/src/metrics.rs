//! Export metrics collection.

use metrics::counter;

use cship_models::Platform;

/// Metric name constants for consistency.
pub mod names {
    /// Total submissions by platform and outcome.
    pub const SUBMISSIONS_TOTAL: &str = "export_submissions_total";

    /// Total jobs that reached `completed`, by platform.
    pub const JOBS_COMPLETED_TOTAL: &str = "export_jobs_completed_total";

    /// Total jobs that reached `failed`, by platform.
    pub const JOBS_FAILED_TOTAL: &str = "export_jobs_failed_total";

    /// Total status poll passes.
    pub const POLL_TICKS_TOTAL: &str = "export_poll_ticks_total";
}

/// Record a submission attempt.
pub fn record_submission(platform: Platform, outcome: &'static str) {
    counter!(
        names::SUBMISSIONS_TOTAL,
        "platform" => platform.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a terminal `completed` transition.
pub fn record_job_completed(platform: Platform) {
    counter!(names::JOBS_COMPLETED_TOTAL, "platform" => platform.as_str()).increment(1);
}

/// Record a terminal `failed` transition.
pub fn record_job_failed(platform: Platform) {
    counter!(names::JOBS_FAILED_TOTAL, "platform" => platform.as_str()).increment(1);
}

/// Record one poll pass over the registry.
pub fn record_poll_tick() {
    counter!(names::POLL_TICKS_TOTAL).increment(1);
}
