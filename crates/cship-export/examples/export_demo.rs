//! Submit a clip export against the live render engine and watch it settle.
//!
//! Requires `RENDER_ENGINE_API_KEY` (and optionally `RENDER_ENGINE_URL`) in
//! the environment or a `.env` file.
//!
//! Usage:
//!   cargo run -p cship-export --example export_demo -- <watch-url> <start-secs> <end-secs> [title]

use std::sync::Arc;
use std::time::Duration;

use cship_engine::{EngineClient, RenderDispatch};
use cship_export::{ExportConfig, ExportEvent, ExportSession};
use cship_models::{ClipRequest, Platform, SourceVideoId};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let url = args.next().ok_or_else(|| anyhow::anyhow!("missing <watch-url>"))?;
    let start: f64 = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("missing <start-secs>"))?
        .parse()?;
    let end: f64 = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("missing <end-secs>"))?
        .parse()?;
    let title = args.next().unwrap_or_default();

    let source = SourceVideoId::parse(&url)?;
    let clip = ClipRequest::new(source, start, end, title);

    let engine: Arc<dyn RenderDispatch> = Arc::new(EngineClient::from_env()?);
    let session = ExportSession::new(engine, ExportConfig::from_env());
    let mut events = session.subscribe();

    session
        .submit_single(&clip, Platform::ALL, true)
        .await?;

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(ExportEvent::RenderStarted { job_id, platform }) => {
                        println!("started   {} -> {}", platform.display_name(), job_id);
                    }
                    Ok(ExportEvent::SubmissionFailed { platform, message, .. }) => {
                        println!("rejected  {}: {}", platform.display_name(), message);
                    }
                    Ok(ExportEvent::JobCompleted { platform, url, .. }) => {
                        println!("completed {} -> {}", platform.display_name(), url.unwrap_or_default());
                    }
                    Ok(ExportEvent::JobFailed { platform, message, .. }) => {
                        println!("failed    {}: {}", platform.display_name(), message.unwrap_or_default());
                    }
                    Err(_) => {}
                }
            }
            _ = tokio::time::sleep(Duration::from_secs(1)) => {
                let progress = session.progress().await;
                println!(
                    "overall {:>5.1}%  ({} rendering, {} done, {} failed)",
                    progress.overall_progress,
                    progress.rendering_count,
                    progress.completed.len(),
                    progress.failed_count
                );
                if progress.is_settled() {
                    break;
                }
            }
        }
    }

    Ok(())
}
