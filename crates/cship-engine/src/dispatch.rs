//! Dispatch capability consumed by the orchestration core.

use async_trait::async_trait;

use cship_models::{CompositionDescriptor, OutputSpec};

use crate::client::EngineClient;
use crate::error::{DispatchError, StatusError};
use crate::types::{RenderHandle, StatusReport};

/// Capability to submit compositions and check render status.
///
/// The orchestration core depends on this trait rather than on
/// [`EngineClient`] directly, so tests can substitute scripted fakes.
#[async_trait]
pub trait RenderDispatch: Send + Sync {
    /// Submit a composition; returns the engine-assigned handle.
    async fn submit(
        &self,
        descriptor: &CompositionDescriptor,
        output: &OutputSpec,
    ) -> Result<RenderHandle, DispatchError>;

    /// Check the status of an engine-assigned job id.
    async fn check_status(&self, job_id: &str) -> Result<StatusReport, StatusError>;
}

#[async_trait]
impl RenderDispatch for EngineClient {
    async fn submit(
        &self,
        descriptor: &CompositionDescriptor,
        output: &OutputSpec,
    ) -> Result<RenderHandle, DispatchError> {
        EngineClient::submit(self, descriptor, output).await
    }

    async fn check_status(&self, job_id: &str) -> Result<StatusReport, StatusError> {
        EngineClient::check_status(self, job_id).await
    }
}
