//! Render status poller.
//!
//! While the registry holds at least one `rendering` job, the poller
//! re-checks every such job against the engine on a fixed period and feeds
//! the resulting transitions back into the registry. The checks for one
//! tick are issued concurrently; convergence into the registry is
//! sequential, so no two writers ever touch the same job.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::{broadcast, Mutex};
use tokio::time::interval;
use tracing::{debug, info, warn};

use cship_engine::{EngineJobStatus, RenderDispatch, StatusReport};
use cship_models::{RenderJobId, RenderStatus};

use crate::config::ExportConfig;
use crate::events::ExportEvent;
use crate::metrics;
use crate::registry::{RenderJobRegistry, StatusUpdate};

/// Failure detail recorded when a job exceeds the render timeout.
const TIMEOUT_MESSAGE: &str = "Render did not finish within the allowed time";

/// Periodic status poller for one export session.
pub struct StatusPoller {
    dispatch: Arc<dyn RenderDispatch>,
    registry: Arc<Mutex<RenderJobRegistry>>,
    events: broadcast::Sender<ExportEvent>,
    poll_interval: Duration,
    render_timeout: Option<Duration>,
}

impl StatusPoller {
    pub fn new(
        dispatch: Arc<dyn RenderDispatch>,
        registry: Arc<Mutex<RenderJobRegistry>>,
        events: broadcast::Sender<ExportEvent>,
        config: &ExportConfig,
    ) -> Self {
        Self {
            dispatch,
            registry,
            events,
            poll_interval: config.poll_interval,
            render_timeout: config.render_timeout,
        }
    }

    /// Poll until no job remains in `rendering`.
    ///
    /// Runs as a background task owned by the session; it exits on its own
    /// once the registry settles and is respawned by the next submission.
    pub async fn run(&self) {
        debug!(interval = ?self.poll_interval, "Status poller started");

        let mut ticker = interval(self.poll_interval);

        loop {
            ticker.tick().await;

            if self.poll_once().await == 0 {
                break;
            }
        }

        debug!("Status poller stopped: no jobs rendering");
    }

    /// Run a single poll pass and return how many jobs are still rendering.
    ///
    /// Every currently-rendering job is checked concurrently; a status-check
    /// failure is transient and leaves that job exactly as it was until the
    /// next pass.
    pub async fn poll_once(&self) -> usize {
        metrics::record_poll_tick();

        let now = Utc::now();
        let mut expired: Vec<RenderJobId> = Vec::new();
        let mut to_check: Vec<(RenderJobId, String)> = Vec::new();

        for job in self.registry.lock().await.rendering_jobs() {
            if let Some(timeout) = self.render_timeout {
                let age_ms = now.signed_duration_since(job.created_at).num_milliseconds();
                if age_ms >= timeout.as_millis() as i64 {
                    expired.push(job.id.clone());
                    continue;
                }
            }
            // Local sentinel ids are terminal by construction and never
            // show up here.
            if let Some(remote) = job.id.as_remote() {
                to_check.push((job.id.clone(), remote.to_string()));
            }
        }

        for id in expired {
            warn!(job_id = %id, "Render timed out");
            self.apply(
                &id,
                StatusUpdate::Failed {
                    error: Some(TIMEOUT_MESSAGE.to_string()),
                },
            )
            .await;
        }

        let reports = join_all(
            to_check
                .iter()
                .map(|(_, remote)| self.dispatch.check_status(remote)),
        )
        .await;

        for ((id, remote), result) in to_check.into_iter().zip(reports) {
            match result {
                Ok(report) => self.converge(&id, report).await,
                Err(e) => {
                    // Transient: the job keeps its state and progress and is
                    // retried on the next tick.
                    warn!(job_id = %remote, "Status check failed: {}", e);
                }
            }
        }

        self.registry.lock().await.rendering_count()
    }

    /// Map an engine status report onto a registry transition.
    async fn converge(&self, id: &RenderJobId, report: StatusReport) {
        let update = match report.status {
            EngineJobStatus::Succeeded => StatusUpdate::Completed { url: report.url },
            EngineJobStatus::Failed => StatusUpdate::Failed {
                error: report.error_message,
            },
            EngineJobStatus::Planned | EngineJobStatus::Rendering => {
                StatusUpdate::Progress(fraction_to_percent(report.progress))
            }
        };

        self.apply(id, update).await;
    }

    /// Converge one transition and publish the matching event.
    async fn apply(&self, id: &RenderJobId, update: StatusUpdate) {
        let updated = self.registry.lock().await.apply_status_update(id, update);

        let Some(job) = updated else {
            return;
        };

        match job.status {
            RenderStatus::Completed => {
                info!(job_id = %job.id, platform = %job.platform, "Render completed");
                metrics::record_job_completed(job.platform);
                let _ = self.events.send(ExportEvent::JobCompleted {
                    job_id: job.id,
                    platform: job.platform,
                    url: job.result_url,
                });
            }
            RenderStatus::Failed => {
                warn!(
                    job_id = %job.id,
                    platform = %job.platform,
                    error = job.error_message.as_deref().unwrap_or("unknown"),
                    "Render failed"
                );
                metrics::record_job_failed(job.platform);
                let _ = self.events.send(ExportEvent::JobFailed {
                    job_id: job.id,
                    platform: job.platform,
                    message: job.error_message,
                });
            }
            RenderStatus::Rendering => {}
        }
    }
}

/// Convert the engine's `[0, 1]` progress fraction to a percentage.
fn fraction_to_percent(fraction: f64) -> u8 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}
