use super::client::GeminiClient;
use crate::client::LlmClient;
use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse, Usage};
use async_trait::async_trait;

/// A [`GeminiClient`] bound to a fixed model, exposed through the
/// provider-neutral [`LlmClient`] trait.
pub struct GeminiModel {
    client: GeminiClient,
    model: String,
}

impl GeminiModel {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl LlmClient for GeminiModel {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut builder = self
            .client
            .message_builder()
            .model(&self.model)
            .user_message(request.prompt);

        if let Some(system) = request.system {
            builder = builder.system(system);
        }
        if let Some(schema) = request.response_schema {
            builder = builder.response_json_schema(schema);
        }
        if let Some(temperature) = request.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(max_tokens) = request.max_output_tokens {
            builder = builder.max_output_tokens(max_tokens);
        }

        let response = builder.send().await?;

        let usage = response.usage_metadata.as_ref().map(|meta| Usage {
            input_tokens: meta.prompt_token_count,
            output_tokens: meta.candidates_token_count,
        });

        let text = response
            .text()
            .ok_or_else(|| LlmError::internal("Model response contained no text"))?;

        Ok(CompletionResponse { text, usage })
    }

    fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
