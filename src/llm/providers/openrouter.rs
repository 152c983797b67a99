//! OpenRouter provider implementation.
//!
//! OpenRouter exposes many hosted models behind one OpenAI-compatible
//! endpoint and honours strict `json_schema` response formats for the models
//! that support structured output.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::LlmError;
use crate::llm::litellm::{build_http_client, execute_chat_completion, ApiRequest, DEFAULT_MODEL};
use crate::llm::{GenerationRequest, GenerationResponse, LlmProvider};

/// Default OpenRouter API endpoint.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// OpenRouter provider for LLM requests.
///
/// Each call to [`LlmProvider::generate`] performs exactly one HTTP request;
/// failures are returned to the caller as-is.
pub struct OpenRouterProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider with the given API key and the
    /// default model.
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Self::with_custom_url(api_key, OPENROUTER_BASE_URL.to_string(), DEFAULT_MODEL.to_string())
    }

    /// Create a new OpenRouter provider with a specific default model.
    pub fn with_model(api_key: String, model: String) -> Result<Self, LlmError> {
        Self::with_custom_url(api_key, OPENROUTER_BASE_URL.to_string(), model)
    }

    /// Create a new OpenRouter provider with custom base URL.
    ///
    /// Useful for testing or using OpenRouter-compatible proxies.
    pub fn with_custom_url(
        api_key: String,
        base_url: String,
        model: String,
    ) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        Ok(Self {
            client: build_http_client()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model: model,
        })
    }

    /// Get the API key (for debugging, returns masked value).
    pub fn api_key_masked(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 8 {
            "*".repeat(chars.len())
        } else {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}...{}", head, tail)
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the default model.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        let api_request = ApiRequest::from_generation(request, &self.default_model);
        let url = format!("{}/chat/completions", self.base_url);

        execute_chat_completion(
            &self.client,
            &url,
            Some(&self.api_key),
            &[
                ("HTTP-Referer", "https://safety-forge.local"),
                ("X-Title", "safety-forge"),
            ],
            &api_request,
        )
        .await
    }
}
