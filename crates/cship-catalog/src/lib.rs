//! Clients for the collaborators around the export core.
//!
//! Two thin request/response wrappers with no internal state machine:
//! - source video metadata lookup against the upstream catalog service
//! - AI-suggested candidate clips for a source video
//!
//! The orchestration core never calls these; their output only ever reaches
//! it as [`cship_models::ClipRequest`] values.

pub mod client;
pub mod error;
pub mod types;

pub use client::{CatalogClient, CatalogConfig};
pub use error::{CatalogError, CatalogResult};
pub use types::{ClipSuggestion, SourceMetadata, Thumbnails};
