use super::client::GeminiClient;
use super::types::*;
use crate::error::LlmError;
use serde_json::Value;

pub struct MessageBuilder<'a> {
    client: &'a GeminiClient,
    model: Option<String>,
    contents: Vec<GeminiContent>,
    system_instruction: Option<String>,
    generation_config: GenerationConfig,
}

impl<'a> MessageBuilder<'a> {
    pub fn new(client: &'a GeminiClient) -> Self {
        Self {
            client,
            model: None,
            contents: Vec::new(),
            system_instruction: None,
            generation_config: GenerationConfig::default(),
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn user_message(mut self, text: impl Into<String>) -> Self {
        self.contents.push(GeminiContent::user(text));
        self
    }

    pub fn model_message(mut self, text: impl Into<String>) -> Self {
        self.contents.push(GeminiContent {
            role: GeminiRole::Model,
            parts: vec![GeminiPart::text(text)],
        });
        self
    }

    pub fn system(mut self, text: impl Into<String>) -> Self {
        self.system_instruction = Some(text.into());
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.generation_config.temperature = Some(temp);
        self
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.generation_config.max_output_tokens = Some(tokens);
        self
    }

    /// Ask for structured JSON output matching the given schema.
    pub fn response_json_schema(mut self, schema: Value) -> Self {
        self.generation_config.response_mime_type = Some("application/json".to_string());
        self.generation_config.response_json_schema = Some(schema);
        self
    }

    pub async fn send(self) -> Result<GeminiGenerateContentResponse, LlmError> {
        let model = self
            .model
            .ok_or_else(|| LlmError::invalid_request("Model is required"))?;

        if self.contents.is_empty() {
            return Err(LlmError::invalid_request(
                "At least one message is required",
            ));
        }

        let request = GeminiGenerateContentRequest {
            contents: self.contents,
            system_instruction: self.system_instruction.map(GeminiContent::user),
            generation_config: Some(self.generation_config),
        };

        self.client.generate_content(model, request).await
    }
}
