//! LLM provider implementations.

pub mod openrouter;

pub use openrouter::{OpenRouterProvider, OPENROUTER_BASE_URL};

// Re-export the main LlmProvider trait from litellm for convenience
pub use super::litellm::LlmProvider;
