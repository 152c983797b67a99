//! Generation client for safety conversations.
//!
//! Wraps an [`LlmProvider`] with the fixed structured-output schema and
//! decodes the returned content into a [`GeneratedPayload`].

use std::sync::Arc;

use crate::dataset::{safety_conversation_response_format, GeneratedPayload};
use crate::error::{GenerationError, LlmError};
use crate::llm::{GenerationRequest, LlmProvider, Message};

/// Default sampling temperature for generation.
pub const DEFAULT_TEMPERATURE: f64 = 1.0;

/// Client that turns a compiled instruction into a structured payload.
#[derive(Clone)]
pub struct ConversationClient {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f64,
}

impl ConversationClient {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Set the temperature, clamped to the range the API accepts.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Builds the request sent for an instruction.
    pub fn build_request(&self, instruction: &str) -> GenerationRequest {
        GenerationRequest::new(self.model.clone(), vec![Message::user(instruction)])
            .with_temperature(self.temperature)
            .with_response_format(safety_conversation_response_format())
    }

    /// Sends one request and decodes the structured payload.
    ///
    /// # Errors
    ///
    /// - `GenerationError::Llm` for transport, HTTP status or empty responses
    /// - `GenerationError::Decode` when the content does not match the schema
    pub async fn generate(&self, instruction: &str) -> Result<GeneratedPayload, GenerationError> {
        let response = self.provider.generate(self.build_request(instruction)).await?;

        tracing::debug!(
            model = %response.model,
            completion_tokens = response.usage.completion_tokens,
            "Received generation response"
        );

        let content = response.first_content().ok_or(LlmError::EmptyResponse)?;
        decode_payload(content)
    }
}

/// Decodes the content string of a response into a payload.
pub fn decode_payload(content: &str) -> Result<GeneratedPayload, GenerationError> {
    serde_json::from_str(content).map_err(|e| GenerationError::Decode(e.to_string()))
}
