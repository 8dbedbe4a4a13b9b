//! Render job orchestration for clip exports.
//!
//! This crate owns the stateful part of ClipShip: an [`ExportSession`]
//! translates clip requests into engine submissions, tracks every resulting
//! render job in an in-memory [`RenderJobRegistry`], polls the engine for
//! status while anything is still rendering, and aggregates batch progress
//! for presentation surfaces.
//!
//! Job state is ephemeral — it lives exactly as long as the session. A
//! failed submission still produces a terminal job (with a locally
//! synthesized id) so batch accounting always matches the number of
//! submission attempts, and a failure on one job never cancels or blocks its
//! siblings.

pub mod config;
pub mod error;
pub mod events;
pub mod metrics;
pub mod poller;
pub mod progress;
pub mod registry;
pub mod session;

pub use config::ExportConfig;
pub use error::ExportError;
pub use events::ExportEvent;
pub use poller::StatusPoller;
pub use progress::{BatchProgress, CompletedRender};
pub use registry::{RenderJobRegistry, StatusUpdate};
pub use session::ExportSession;
