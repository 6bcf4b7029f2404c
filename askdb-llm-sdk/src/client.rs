use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;

/// Core trait for LLM clients
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete a request (non-streaming)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Provider name (e.g., "Google")
    fn provider_name(&self) -> &str;

    /// Model name (e.g., "gemini-2.5-pro")
    fn model_name(&self) -> &str;
}
