//! Export session: the long-lived orchestration object.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use cship_engine::RenderDispatch;
use cship_models::{ClipRequest, CompositionDescriptor, OutputSpec, Platform, RenderJob};

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::events::ExportEvent;
use crate::metrics;
use crate::poller::StatusPoller;
use crate::progress::BatchProgress;
use crate::registry::RenderJobRegistry;

/// One export session: owns the job registry and the polling loop for a
/// batch of renders.
///
/// Submissions are fire-and-forget; outcomes are observed through
/// [`snapshot`](Self::snapshot), [`progress`](Self::progress) and the event
/// channel. Dropping or resetting the session stops polling and discards
/// local state — it does not abort renders already running on the engine.
pub struct ExportSession {
    dispatch: Arc<dyn RenderDispatch>,
    registry: Arc<Mutex<RenderJobRegistry>>,
    events: broadcast::Sender<ExportEvent>,
    config: ExportConfig,
    poller_handle: Mutex<Option<JoinHandle<()>>>,
}

impl ExportSession {
    /// Create a session over a dispatch capability.
    pub fn new(dispatch: Arc<dyn RenderDispatch>, config: ExportConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        Self {
            dispatch,
            registry: Arc::new(Mutex::new(RenderJobRegistry::new())),
            events,
            config,
            poller_handle: Mutex::new(None),
        }
    }

    /// Export one clip to one or more platforms.
    ///
    /// Input errors are rejected synchronously, before any dispatch call;
    /// after that, submission is best-effort fan-out — a failure on one
    /// platform never blocks the rest.
    pub async fn submit_single(
        &self,
        clip: &ClipRequest,
        platforms: &[Platform],
        captions_enabled: bool,
    ) -> Result<(), ExportError> {
        if platforms.is_empty() {
            return Err(ExportError::EmptySelection);
        }
        clip.validate()?;

        for platform in platforms {
            self.dispatch_one(clip, *platform, captions_enabled).await;
        }

        self.ensure_polling().await;
        Ok(())
    }

    /// Export a batch of clips to a single platform.
    ///
    /// The whole batch is validated before the first dispatch call: an
    /// invalid clip rejects the batch synchronously and creates no jobs.
    pub async fn submit_batch(
        &self,
        clips: &[ClipRequest],
        platform: Platform,
        captions_enabled: bool,
    ) -> Result<(), ExportError> {
        if clips.is_empty() {
            return Err(ExportError::EmptySelection);
        }
        for clip in clips {
            clip.validate()?;
        }

        for clip in clips {
            self.dispatch_one(clip, platform, captions_enabled).await;
        }

        self.ensure_polling().await;
        Ok(())
    }

    /// Submit one (clip, platform) pair and record the outcome.
    async fn dispatch_one(&self, clip: &ClipRequest, platform: Platform, captions_enabled: bool) {
        let clip = clip.clone().with_captions(captions_enabled);
        let descriptor = CompositionDescriptor::build(&clip);
        let output = OutputSpec::for_platform(platform);

        match self.dispatch.submit(&descriptor, &output).await {
            Ok(handle) => {
                let job_id = self
                    .registry
                    .lock()
                    .await
                    .create_from_submission(clip, platform, handle.id);

                info!(job_id = %job_id, platform = %platform, "Render started");
                metrics::record_submission(platform, "accepted");
                let _ = self.events.send(ExportEvent::RenderStarted { job_id, platform });
            }
            Err(e) => {
                // The attempt still gets a (terminal) job so batch
                // accounting stays complete; siblings continue.
                warn!(platform = %platform, "Submission failed: {}", e);

                let job_id = self
                    .registry
                    .lock()
                    .await
                    .create_failed_sentinel(clip, platform, e.to_string());

                metrics::record_submission(platform, "failed");
                let _ = self.events.send(ExportEvent::SubmissionFailed {
                    job_id,
                    platform,
                    message: e.to_string(),
                });
            }
        }
    }

    /// Spawn the background poller if it is not already running and there is
    /// something to poll.
    async fn ensure_polling(&self) {
        if !self.config.polling_enabled {
            return;
        }

        let mut handle = self.poller_handle.lock().await;
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        if self.registry.lock().await.rendering_count() == 0 {
            return;
        }

        let poller = self.poller();
        *handle = Some(tokio::spawn(async move { poller.run().await }));
    }

    /// Build a poller over this session's registry.
    pub fn poller(&self) -> StatusPoller {
        StatusPoller::new(
            Arc::clone(&self.dispatch),
            Arc::clone(&self.registry),
            self.events.clone(),
            &self.config,
        )
    }

    /// Run one manual poll pass. Returns how many jobs are still rendering.
    pub async fn poll_once(&self) -> usize {
        self.poller().poll_once().await
    }

    /// Ordered snapshot of every tracked job.
    pub async fn snapshot(&self) -> Vec<RenderJob> {
        self.registry.lock().await.snapshot()
    }

    /// Aggregate progress over the current snapshot.
    pub async fn progress(&self) -> BatchProgress {
        BatchProgress::from_snapshot(&self.snapshot().await)
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<ExportEvent> {
        self.events.subscribe()
    }

    /// Discard all tracked jobs and stop polling.
    ///
    /// Renders already accepted by the engine keep running there; the
    /// session just stops observing them.
    pub async fn reset(&self) {
        if let Some(handle) = self.poller_handle.lock().await.take() {
            handle.abort();
        }
        self.registry.lock().await.clear();
        info!("Export session reset");
    }
}
