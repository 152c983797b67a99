//! LLM prompts for safety conversation generation.
//!
//! - [`generation`] - the instruction template and its compiler
//! - [`seeds`] - diversity seeds for the opening user message

pub mod generation;
pub mod seeds;

pub use generation::{
    check_template, PromptCompiler, REQUIRED_PLACEHOLDERS, SAFETY_GENERATION_TEMPLATE,
    SEEDS_PER_PROMPT,
};
pub use seeds::USER_FIRST_PROMPTS;
