use async_trait::async_trait;

use super::error::ApiError;
use super::types::{AudioResult, CloneRequest, SynthesisRequest};

/// The two remote endpoints the panel talks to.
#[async_trait]
pub trait AudioService: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Upload a sample with pitch/speed factors and get back the cloned audio
    async fn clone_audio(&self, request: &CloneRequest) -> Result<AudioResult, ApiError>;

    /// Synthesize speech for the given text
    async fn text_to_speech(&self, request: &SynthesisRequest) -> Result<AudioResult, ApiError>;
}
