//! Pipeline orchestration for safety conversation generation.
//!
//! # Architecture
//!
//! - **Config**: Layered run settings (defaults, YAML, environment, CLI)
//! - **Orchestrator**: Runs N independent tasks over a bounded worker pool
//!   and appends each accepted example to the training and benchmark sinks
//!
//! # Pipeline Flow
//!
//! 1. **Reset**: Both sink files are removed
//! 2. **Generation**: Each index is sampled, compiled, sent to the model,
//!    assembled and validated
//! 3. **Persistence**: Accepted examples are written in completion order
//! 4. **Summary**: Successes and failures by kind are reported
//!
//! # Example
//!
//! ```rust,ignore
//! use safety_forge::pipeline::{GenerationConfig, GenerationOrchestrator};
//!
//! let config = GenerationConfig::from_env()?.with_num_examples(20);
//! let orchestrator = GenerationOrchestrator::from_config(&config, provider)?;
//! let summary = orchestrator.run(config.num_examples).await?;
//! println!("{} saved, {} failed", summary.succeeded, summary.failed);
//! ```

pub mod config;
pub mod orchestrator;

pub use config::{
    resolve_api_key, ConfigError, GenerationConfig, DEFAULT_API_KEY_FILE, DEFAULT_BENCHMARK_FILE,
    DEFAULT_TRAINING_FILE, ENV_PREFIX,
};
pub use orchestrator::{GenerationOrchestrator, GenerationSummary, PipelineError};
