//! Client for the external render engine.
//!
//! The engine accepts a layered composition plus an output specification and
//! renders it asynchronously. This crate shapes the request, maps the
//! engine's wire schema, and exposes the [`RenderDispatch`] capability the
//! orchestration core consumes. It never tracks job state itself.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod types;

pub use client::{EngineClient, EngineConfig};
pub use dispatch::RenderDispatch;
pub use error::{DispatchError, StatusError};
pub use types::{EngineJobStatus, RenderHandle, StatusReport};
