//! LLM integration for safety-forge.
//!
//! Provides the OpenAI-compatible request/response types, the
//! [`LlmProvider`] trait the generation pipeline is written against, and two
//! providers: OpenRouter and a generic LiteLLM gateway.
//!
//! ```ignore
//! use safety_forge::llm::{GenerationRequest, LlmProvider, Message, OpenRouterProvider};
//!
//! let provider = OpenRouterProvider::with_model(api_key, "google/gemini-2.5-flash".into())?;
//! let request = GenerationRequest::new("", vec![Message::user("Hello!")])
//!     .with_temperature(1.0);
//! let response = provider.generate(request).await?;
//! ```

pub mod litellm;
pub mod providers;

pub use litellm::{
    Choice, GenerationRequest, GenerationResponse, LiteLlmClient, LlmProvider, Message, Usage,
    DEFAULT_MODEL, REQUEST_TIMEOUT_SECS,
};
pub use providers::{OpenRouterProvider, OPENROUTER_BASE_URL};
