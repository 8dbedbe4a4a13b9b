//! Engine client error types.

use thiserror::Error;

/// Submission failure.
///
/// Any of these still yields a terminal `failed` render job upstream so
/// batch accounting stays complete — dispatch failure is never silently
/// dropped.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Credentials were missing or rejected by the engine.
    #[error("Render engine rejected credentials")]
    Unauthorized,

    /// The engine could not accept the submission (unsupported source,
    /// malformed or empty response).
    #[error("Render engine rejected the submission: {0}")]
    Rejected(String),

    /// The engine or the network path to it is unavailable.
    #[error("Render engine transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Status check failure.
///
/// Always transient: the poller leaves the job untouched and retries on the
/// next tick. A status check failure never terminates a job by itself.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("Status check transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed status response: {0}")]
    InvalidResponse(String),
}
