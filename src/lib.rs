//! safety-forge: Synthetic safety conversation generator and evaluator.
//!
//! This library samples safety scenarios, asks an LLM for structured
//! multi-turn conversations, validates and persists them as a training file
//! and a benchmark file, and grades candidate replies against benchmark
//! records with a rule-based evaluator.

// Core modules
pub mod categories;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod export;
pub mod generator;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod validation;

// Re-export commonly used error types
pub use error::{ExportError, GenerationError, LlmError, PromptError, ValidationError};
