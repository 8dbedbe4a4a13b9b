//! Export session configuration.

use std::time::Duration;

/// Export session configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Fixed status polling period.
    pub poll_interval: Duration,

    /// Upper bound on how long a job may stay `rendering` before the poller
    /// fails it. `None` disables the bound and a job may render forever.
    pub render_timeout: Option<Duration>,

    /// Whether the session spawns the background poller at all. When
    /// disabled, status convergence only happens through explicit
    /// [`StatusPoller::poll_once`](crate::StatusPoller::poll_once) calls.
    pub polling_enabled: bool,

    /// Buffer size of the session event channel.
    pub event_capacity: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            render_timeout: Some(Duration::from_secs(900)), // 15 minutes
            polling_enabled: true,
            event_capacity: 64,
        }
    }
}

impl ExportConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            poll_interval: Duration::from_secs(
                std::env::var("EXPORT_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3),
            ),
            // 0 disables the timeout entirely
            render_timeout: std::env::var("EXPORT_RENDER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map_or(defaults.render_timeout, |secs| {
                    (secs > 0).then(|| Duration::from_secs(secs))
                }),
            polling_enabled: std::env::var("EXPORT_POLLING_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            event_capacity: std::env::var("EXPORT_EVENT_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.event_capacity),
        }
    }
}
