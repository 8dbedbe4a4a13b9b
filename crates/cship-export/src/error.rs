//! Export surface error types.

use thiserror::Error;

use cship_models::ClipValidationError;

/// Synchronous rejection of an export request.
///
/// These are raised before any dispatch call is made; no render job exists
/// for a rejected request. Everything that goes wrong after dispatch is
/// recorded on the jobs themselves, never surfaced as an error here.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No clips or no platforms were selected.
    #[error("Nothing selected for export")]
    EmptySelection,

    /// A clip request violated the time-range invariant.
    #[error(transparent)]
    InvalidClip(#[from] ClipValidationError),
}
