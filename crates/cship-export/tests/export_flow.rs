//! End-to-end orchestration tests against a scripted engine fake.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use cship_engine::{
    DispatchError, EngineJobStatus, RenderDispatch, RenderHandle, StatusError, StatusReport,
};
use cship_export::{ExportConfig, ExportError, ExportEvent, ExportSession};
use cship_models::{ClipRequest, CompositionDescriptor, OutputSpec, Platform, RenderStatus, SourceVideoId};

/// Scripted outcome for one submission attempt.
enum SubmitScript {
    Accept(&'static str),
    Unauthorized,
    Reject(&'static str),
}

/// Scripted outcome for one status check of a given job.
enum StatusScript {
    Rendering(f64),
    Succeeded(&'static str),
    Failed(&'static str),
    Unreachable,
}

#[derive(Default)]
struct ScriptState {
    submits: VecDeque<SubmitScript>,
    statuses: HashMap<String, VecDeque<StatusScript>>,
    submitted: Vec<CompositionDescriptor>,
    polled: Vec<String>,
}

/// In-test engine double with pre-programmed responses.
#[derive(Default)]
struct ScriptedEngine {
    state: Mutex<ScriptState>,
}

impl ScriptedEngine {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn on_submit(&self, script: SubmitScript) {
        self.state.lock().unwrap().submits.push_back(script);
    }

    fn on_status(&self, job_id: &str, script: StatusScript) {
        self.state
            .lock()
            .unwrap()
            .statuses
            .entry(job_id.to_string())
            .or_default()
            .push_back(script);
    }

    fn polled_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().polled.clone()
    }

    fn submissions(&self) -> Vec<CompositionDescriptor> {
        self.state.lock().unwrap().submitted.clone()
    }
}

#[async_trait]
impl RenderDispatch for ScriptedEngine {
    async fn submit(
        &self,
        descriptor: &CompositionDescriptor,
        _output: &OutputSpec,
    ) -> Result<RenderHandle, DispatchError> {
        let mut state = self.state.lock().unwrap();
        state.submitted.push(descriptor.clone());

        match state.submits.pop_front().expect("unscripted submit call") {
            SubmitScript::Accept(id) => Ok(RenderHandle {
                id: id.to_string(),
                status: EngineJobStatus::Planned,
                url: None,
            }),
            SubmitScript::Unauthorized => Err(DispatchError::Unauthorized),
            SubmitScript::Reject(message) => Err(DispatchError::Rejected(message.to_string())),
        }
    }

    async fn check_status(&self, job_id: &str) -> Result<StatusReport, StatusError> {
        let mut state = self.state.lock().unwrap();
        state.polled.push(job_id.to_string());

        let script = state
            .statuses
            .get_mut(job_id)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(StatusScript::Rendering(0.0));

        match script {
            StatusScript::Rendering(fraction) => Ok(StatusReport {
                id: job_id.to_string(),
                status: EngineJobStatus::Rendering,
                progress: fraction,
                url: None,
                error_message: None,
            }),
            StatusScript::Succeeded(url) => Ok(StatusReport {
                id: job_id.to_string(),
                status: EngineJobStatus::Succeeded,
                progress: 1.0,
                url: Some(url.to_string()),
                error_message: None,
            }),
            StatusScript::Failed(message) => Ok(StatusReport {
                id: job_id.to_string(),
                status: EngineJobStatus::Failed,
                progress: 0.0,
                url: None,
                error_message: Some(message.to_string()),
            }),
            StatusScript::Unreachable => {
                Err(StatusError::InvalidResponse("scripted outage".to_string()))
            }
        }
    }
}

fn clip(start: f64) -> ClipRequest {
    ClipRequest::new(
        SourceVideoId::parse("dQw4w9WgXcQ").unwrap(),
        start,
        start + 30.0,
        "Test clip",
    )
}

/// Session with background polling disabled, stepped manually in tests.
fn manual_session(engine: &Arc<ScriptedEngine>) -> ExportSession {
    let config = ExportConfig {
        polling_enabled: false,
        ..ExportConfig::default()
    };
    ExportSession::new(Arc::clone(engine) as Arc<dyn RenderDispatch>, config)
}

#[tokio::test]
async fn three_clip_batch_settles_partially() {
    let engine = ScriptedEngine::new();
    engine.on_submit(SubmitScript::Accept("rend-1"));
    engine.on_submit(SubmitScript::Accept("rend-2"));
    engine.on_submit(SubmitScript::Accept("rend-3"));
    engine.on_status("rend-1", StatusScript::Succeeded("https://cdn.example/x.mp4"));
    engine.on_status("rend-2", StatusScript::Failed("render crashed"));
    engine.on_status("rend-3", StatusScript::Rendering(0.4));

    let session = manual_session(&engine);
    session
        .submit_batch(&[clip(0.0), clip(60.0), clip(120.0)], Platform::Tiktok, true)
        .await
        .unwrap();

    // Every accepted submission starts rendering at zero progress.
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.len(), 3);
    assert!(snapshot
        .iter()
        .all(|job| job.status == RenderStatus::Rendering && job.progress == 0));

    let remaining = session.poll_once().await;
    assert_eq!(remaining, 1);

    let progress = session.progress().await;
    assert_eq!(progress.total, 3);
    assert_eq!(progress.completed.len(), 1);
    assert_eq!(progress.completed[0].url, "https://cdn.example/x.mp4");
    assert_eq!(progress.failed_count, 1);
    assert_eq!(progress.rendering_count, 1);
    assert!((progress.overall_progress - 140.0 / 3.0).abs() < 0.01);

    let still_rendering = session
        .snapshot()
        .await
        .into_iter()
        .find(|job| job.status == RenderStatus::Rendering)
        .unwrap();
    assert_eq!(still_rendering.progress, 40);
}

#[tokio::test]
async fn job_count_matches_submission_attempts() {
    let engine = ScriptedEngine::new();
    engine.on_submit(SubmitScript::Accept("rend-1"));
    engine.on_submit(SubmitScript::Unauthorized);
    engine.on_submit(SubmitScript::Reject("unsupported source"));

    let session = manual_session(&engine);
    let mut events = session.subscribe();

    session
        .submit_batch(&[clip(0.0), clip(60.0), clip(120.0)], Platform::Tiktok, true)
        .await
        .unwrap();

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.len(), 3);
    assert_eq!(session.progress().await.failed_count, 2);

    // Failed attempts carry local sentinel ids; the accepted one is remote.
    assert!(!snapshot[0].id.is_local());
    assert!(snapshot[1].id.is_local());
    assert!(snapshot[2].id.is_local());

    let mut started = 0;
    let mut failed = 0;
    while let Ok(event) = events.try_recv() {
        match event {
            ExportEvent::RenderStarted { .. } => started += 1,
            ExportEvent::SubmissionFailed { .. } => failed += 1,
            _ => {}
        }
    }
    assert_eq!(started, 1);
    assert_eq!(failed, 2);
}

#[tokio::test]
async fn unauthorized_submission_is_never_polled() {
    let engine = ScriptedEngine::new();
    engine.on_submit(SubmitScript::Unauthorized);

    let session = manual_session(&engine);
    session
        .submit_single(&clip(0.0), &[Platform::InstagramReels], true)
        .await
        .unwrap();

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].status, RenderStatus::Failed);
    assert!(snapshot[0].id.is_local());

    let remaining = session.poll_once().await;
    assert_eq!(remaining, 0);
    assert!(engine.polled_ids().is_empty());
}

#[tokio::test]
async fn transient_status_failure_leaves_job_untouched() {
    let engine = ScriptedEngine::new();
    engine.on_submit(SubmitScript::Accept("rend-1"));
    engine.on_status("rend-1", StatusScript::Unreachable);
    engine.on_status("rend-1", StatusScript::Rendering(0.55));

    let session = manual_session(&engine);
    session
        .submit_single(&clip(0.0), &[Platform::Tiktok], true)
        .await
        .unwrap();

    let before = session.snapshot().await;
    let remaining = session.poll_once().await;
    assert_eq!(remaining, 1);

    // The failed check changed nothing, not even the update timestamp.
    assert_eq!(session.snapshot().await, before);

    // The next tick retries and lands the progress report.
    session.poll_once().await;
    assert_eq!(session.snapshot().await[0].progress, 55);
}

#[tokio::test]
async fn terminal_jobs_are_not_polled_again() {
    let engine = ScriptedEngine::new();
    engine.on_submit(SubmitScript::Accept("rend-1"));
    engine.on_status("rend-1", StatusScript::Succeeded("https://cdn.example/x.mp4"));

    let session = manual_session(&engine);
    session
        .submit_single(&clip(0.0), &[Platform::Tiktok], true)
        .await
        .unwrap();

    assert_eq!(session.poll_once().await, 0);
    assert_eq!(engine.polled_ids().len(), 1);

    // A further pass has nothing rendering and issues no checks.
    assert_eq!(session.poll_once().await, 0);
    assert_eq!(engine.polled_ids().len(), 1);
}

#[tokio::test]
async fn captions_flag_controls_caption_layer() {
    let engine = ScriptedEngine::new();
    engine.on_submit(SubmitScript::Accept("rend-1"));
    engine.on_submit(SubmitScript::Accept("rend-2"));

    let session = manual_session(&engine);
    session
        .submit_single(&clip(0.0), &[Platform::Tiktok], false)
        .await
        .unwrap();
    session
        .submit_single(&clip(60.0), &[Platform::Tiktok], true)
        .await
        .unwrap();

    let submissions = engine.submissions();
    assert!(!submissions[0].has_captions());
    assert!(submissions[1].has_captions());
}

#[tokio::test]
async fn input_errors_reject_before_any_dispatch() {
    let engine = ScriptedEngine::new();
    let session = manual_session(&engine);

    let err = session
        .submit_batch(&[], Platform::Tiktok, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::EmptySelection));

    let err = session
        .submit_single(&clip(0.0), &[], true)
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::EmptySelection));

    let mut invalid = clip(0.0);
    invalid.end_seconds = invalid.start_seconds;
    let err = session
        .submit_batch(&[clip(0.0), invalid], Platform::Tiktok, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::InvalidClip(_)));

    // No job was created and the engine never saw a request.
    assert!(session.snapshot().await.is_empty());
    assert!(engine.submissions().is_empty());
}

#[tokio::test]
async fn render_timeout_fails_stuck_job() {
    let engine = ScriptedEngine::new();
    engine.on_submit(SubmitScript::Accept("rend-1"));

    let config = ExportConfig {
        polling_enabled: false,
        render_timeout: Some(Duration::ZERO),
        ..ExportConfig::default()
    };
    let session = ExportSession::new(Arc::clone(&engine) as Arc<dyn RenderDispatch>, config);

    session
        .submit_single(&clip(0.0), &[Platform::Tiktok], true)
        .await
        .unwrap();

    let remaining = session.poll_once().await;
    assert_eq!(remaining, 0);

    let job = &session.snapshot().await[0];
    assert_eq!(job.status, RenderStatus::Failed);
    assert!(job
        .error_message
        .as_deref()
        .unwrap()
        .contains("did not finish"));

    // The expired job was failed locally, without a status round-trip.
    assert!(engine.polled_ids().is_empty());
}

#[tokio::test]
async fn terminal_transitions_publish_events() {
    let engine = ScriptedEngine::new();
    engine.on_submit(SubmitScript::Accept("rend-1"));
    engine.on_submit(SubmitScript::Accept("rend-2"));
    engine.on_status("rend-1", StatusScript::Succeeded("https://cdn.example/x.mp4"));
    engine.on_status("rend-2", StatusScript::Failed("render crashed"));

    let session = manual_session(&engine);
    let mut events = session.subscribe();

    session
        .submit_batch(&[clip(0.0), clip(60.0)], Platform::YoutubeShorts, true)
        .await
        .unwrap();
    session.poll_once().await;

    let mut completed_urls = Vec::new();
    let mut failure_messages = Vec::new();
    while let Ok(event) = events.try_recv() {
        match event {
            ExportEvent::JobCompleted { url, .. } => completed_urls.push(url),
            ExportEvent::JobFailed { message, .. } => failure_messages.push(message),
            _ => {}
        }
    }

    assert_eq!(
        completed_urls,
        vec![Some("https://cdn.example/x.mp4".to_string())]
    );
    assert_eq!(
        failure_messages,
        vec![Some("render crashed".to_string())]
    );
}

#[tokio::test]
async fn background_poller_settles_and_restarts() {
    let engine = ScriptedEngine::new();
    engine.on_submit(SubmitScript::Accept("rend-1"));
    engine.on_status("rend-1", StatusScript::Rendering(0.5));
    engine.on_status("rend-1", StatusScript::Succeeded("https://cdn.example/a.mp4"));

    let config = ExportConfig {
        poll_interval: Duration::from_millis(20),
        ..ExportConfig::default()
    };
    let session = ExportSession::new(Arc::clone(&engine) as Arc<dyn RenderDispatch>, config);

    session
        .submit_single(&clip(0.0), &[Platform::Tiktok], true)
        .await
        .unwrap();
    wait_until_settled(&session).await;
    assert_eq!(session.progress().await.completed.len(), 1);

    // A new submission restarts the (stopped) polling loop.
    engine.on_submit(SubmitScript::Accept("rend-2"));
    engine.on_status("rend-2", StatusScript::Succeeded("https://cdn.example/b.mp4"));

    session
        .submit_single(&clip(60.0), &[Platform::Tiktok], true)
        .await
        .unwrap();
    wait_until_settled(&session).await;
    assert_eq!(session.progress().await.completed.len(), 2);
}

#[tokio::test]
async fn reset_discards_jobs_and_stops_polling() {
    let engine = ScriptedEngine::new();
    engine.on_submit(SubmitScript::Accept("rend-1"));

    let session = manual_session(&engine);
    session
        .submit_single(&clip(0.0), &[Platform::Tiktok], true)
        .await
        .unwrap();
    assert_eq!(session.snapshot().await.len(), 1);

    session.reset().await;
    assert!(session.snapshot().await.is_empty());
    assert_eq!(session.progress().await.overall_progress, 0.0);
}

async fn wait_until_settled(session: &ExportSession) {
    for _ in 0..100 {
        if session.progress().await.is_settled() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session did not settle in time");
}
