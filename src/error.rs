//! Error types for safety-forge operations.
//!
//! Defines error types for each subsystem:
//! - LLM API interactions
//! - Prompt template compilation
//! - Conversation and record validation
//! - Dataset sink writes
//! - Per-task generation outcomes

use thiserror::Error;

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing API key: OPENROUTER_API_KEY not set and no key file found")]
    MissingApiKey,

    #[error("Missing API base URL: LITELLM_API_BASE environment variable not set")]
    MissingApiBase,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },

    #[error("LLM response contained no choices")]
    EmptyResponse,
}

/// Errors raised while compiling an instruction template.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Template is missing placeholder '{0}'")]
    MissingPlaceholder(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during validation operations.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Messages array must have at least 2 messages, got {0}")]
    TooFewMessages(usize),

    #[error("Message {index} has role '{actual}' but should be '{expected}'")]
    RoleMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("Message {0} has empty content")]
    EmptyContent(usize),

    #[error("Last message must be from assistant")]
    LastMessageNotAssistant,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid expected_action: {0}")]
    InvalidAction(String),

    #[error("expected_action count ({actions}) doesn't match user turns ({user_turns})")]
    ActionCountMismatch { actions: usize, user_turns: usize },

    #[error("Schema validation failed: {0}")]
    SchemaError(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while writing or reading dataset files.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line} of '{path}' is not valid JSON: {source}")]
    MalformedLine {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of a single failed generation task.
///
/// Every failure a task can hit is folded into this type so the orchestrator
/// isolates tasks by matching on a value rather than catching panics.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Failed to decode generated payload: {0}")]
    Decode(String),

    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Sink write failed: {0}")]
    Sink(#[from] ExportError),
}

impl GenerationError {
    /// Short, stable label for the failure class, used for summary counters.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Llm(_) => "llm",
            GenerationError::Decode(_) => "decode",
            GenerationError::Prompt(_) => "prompt",
            GenerationError::Validation(ValidationError::MissingField(_))
            | GenerationError::Validation(ValidationError::SchemaError(_)) => "schema",
            GenerationError::Validation(_) => "validation",
            GenerationError::Sink(_) => "sink",
        }
    }
}
