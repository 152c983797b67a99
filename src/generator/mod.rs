//! Conversation generation pipeline for safety-forge.
//!
//! This module implements the per-example pipeline:
//!
//! 1. **Scenario Sampling** - Deterministic draw of category, subcategory, risk level and attack patterns
//! 2. **Prompt Compilation** - Rendering the generation template with the scenario and seed prompts
//! 3. **Generation** - One structured-output request to the model
//! 4. **Assembly** - Merging scenario metadata and model output into a record
//! 5. **Validation** - Structural checks before the record is accepted
//!
//! # Example
//!
//! ```ignore
//! use safety_forge::generator::{ConversationClient, ExampleAssembler, ExampleGenerator, ScenarioSampler};
//! use safety_forge::prompts::PromptCompiler;
//!
//! let client = ConversationClient::new(provider, "google/gemini-2.5-flash");
//! let generator = ExampleGenerator::new(
//!     ScenarioSampler::new(0),
//!     PromptCompiler::builtin(),
//!     client,
//!     ExampleAssembler::today(),
//! );
//! let example = generator.generate(3).await?;
//! ```

pub mod assembler;
pub mod client;
pub mod sampler;

pub use assembler::ExampleAssembler;
pub use client::{decode_payload, ConversationClient, DEFAULT_TEMPERATURE};
pub use sampler::{ScenarioParameters, ScenarioSampler, MAX_ATTACK_PATTERNS};

use crate::dataset::Example;
use crate::error::GenerationError;
use crate::prompts::PromptCompiler;
use crate::validation::validate_example;

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GenerationError>;

/// A compiled instruction together with the scenario it was rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPrompt {
    pub index: usize,
    pub params: ScenarioParameters,
    pub instruction: String,
}

/// High-level generator that combines all pipeline stages for one index.
#[derive(Clone)]
pub struct ExampleGenerator {
    sampler: ScenarioSampler,
    compiler: PromptCompiler,
    client: ConversationClient,
    assembler: ExampleAssembler,
}

impl ExampleGenerator {
    pub fn new(
        sampler: ScenarioSampler,
        compiler: PromptCompiler,
        client: ConversationClient,
        assembler: ExampleAssembler,
    ) -> Self {
        Self {
            sampler,
            compiler,
            client,
            assembler,
        }
    }

    /// Samples the scenario and renders the instruction without calling the model.
    ///
    /// Sampling and seed selection draw from the same per-index stream, so the
    /// result is fully determined by the base seed and `index`.
    pub fn prepare(&self, index: usize) -> PreparedPrompt {
        prepare_prompt(&self.sampler, &self.compiler, index)
    }

    /// Runs every stage for `index` and returns a validated record.
    ///
    /// # Errors
    ///
    /// Any failure of the model call, payload decoding, or structural
    /// validation is returned; nothing is retried.
    pub async fn generate(&self, index: usize) -> Result<Example> {
        let prepared = self.prepare(index);

        tracing::debug!(
            index,
            category = %prepared.params.category,
            risk_level = %prepared.params.risk_level,
            "Requesting conversation"
        );

        let payload = self.client.generate(&prepared.instruction).await?;
        let example = self
            .assembler
            .assemble(prepared.index, prepared.params, payload);
        validate_example(&example)?;
        Ok(example)
    }

    pub fn sampler(&self) -> &ScenarioSampler {
        &self.sampler
    }

    pub fn client(&self) -> &ConversationClient {
        &self.client
    }
}

/// Renders the instruction for `index` from a sampler and compiler.
pub fn prepare_prompt(
    sampler: &ScenarioSampler,
    compiler: &PromptCompiler,
    index: usize,
) -> PreparedPrompt {
    let mut rng = sampler.rng_for(index);
    let params = ScenarioSampler::sample_with(&mut rng);
    let instruction = compiler.compile(&params, &mut rng);
    PreparedPrompt {
        index,
        params,
        instruction,
    }
}
