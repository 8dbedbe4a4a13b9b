//! Shared data models for the ClipShip backend.
//!
//! This crate provides Serde-serializable types for:
//! - Clip export requests and their validation
//! - Destination platforms and output specifications
//! - Composition descriptors (the layered render description)
//! - Render jobs, their identifiers and lifecycle states
//! - Source video references

pub mod clip;
pub mod composition;
pub mod job;
pub mod platform;
pub mod source;

// Re-export common types
pub use clip::{format_seconds, ClipRequest, ClipValidationError};
pub use composition::{CaptionStyle, CompositionDescriptor, Layer, LayerFit, TitleStyle};
pub use job::{RenderJob, RenderJobId, RenderStatus};
pub use platform::{FrameSize, OutputSpec, Platform, PlatformParseError, FRAME_RATE};
pub use source::{SourceIdError, SourceVideoId};
