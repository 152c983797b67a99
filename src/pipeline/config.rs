//! Generation run configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! `SAFETY_FORGE_*` environment variables, then command-line flags applied by
//! the caller through the builder methods.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::llm::{DEFAULT_MODEL, OPENROUTER_BASE_URL};

/// Default training sink file name.
pub const DEFAULT_TRAINING_FILE: &str = "safety_sft_v1.jsonl";

/// Default benchmark sink file name.
pub const DEFAULT_BENCHMARK_FILE: &str = "safetybench_v1.jsonl";

/// Default file the API key is read from when none is given directly.
pub const DEFAULT_API_KEY_FILE: &str = "openroutertoken.txt";

/// Prefix of every environment variable read by [`GenerationConfig::from_env`].
pub const ENV_PREFIX: &str = "SAFETY_FORGE_";

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// No API key was given and the key file could not be read.
    #[error("Missing API key: pass --api-key, set OPENROUTER_API_KEY, or create '{0}'")]
    MissingApiKey(String),

    /// The YAML configuration file could not be parsed.
    #[error("Invalid configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Number of generation tasks to run.
    pub num_examples: usize,
    /// Maximum number of requests in flight.
    pub max_workers: usize,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Offset added to each example index to seed its random stream.
    pub seed: u64,
    /// OpenAI-compatible API base URL.
    pub base_url: String,
    /// Directory both sinks are written into.
    pub output_dir: PathBuf,
    /// Training sink file name, relative to `output_dir`.
    pub training_file: String,
    /// Benchmark sink file name, relative to `output_dir`.
    pub benchmark_file: String,
    /// Custom instruction template replacing the built-in one.
    pub template_path: Option<PathBuf>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            num_examples: 100,
            max_workers: 10,
            model: DEFAULT_MODEL.to_string(),
            temperature: 1.0,
            seed: 0,
            base_url: OPENROUTER_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
            training_file: DEFAULT_TRAINING_FILE.to_string(),
            benchmark_file: DEFAULT_BENCHMARK_FILE.to_string(),
            template_path: None,
        }
    }
}

impl GenerationConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a YAML file; fields it omits keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Creates configuration from defaults and environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SAFETY_FORGE_NUM_EXAMPLES`: Number of examples (default: 100)
    /// - `SAFETY_FORGE_MAX_WORKERS`: Concurrent requests (default: 10)
    /// - `SAFETY_FORGE_MODEL`: Model identifier (default: google/gemini-2.5-flash)
    /// - `SAFETY_FORGE_TEMPERATURE`: Sampling temperature (default: 1.0)
    /// - `SAFETY_FORGE_SEED`: Base seed (default: 0)
    /// - `SAFETY_FORGE_BASE_URL`: API base URL (default: https://openrouter.ai/api/v1)
    /// - `SAFETY_FORGE_OUTPUT_DIR`: Output directory (default: .)
    /// - `SAFETY_FORGE_TRAINING_FILE`: Training sink file name
    /// - `SAFETY_FORGE_BENCHMARK_FILE`: Benchmark sink file name
    /// - `SAFETY_FORGE_TEMPLATE`: Custom instruction template path
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Applies `SAFETY_FORGE_*` environment variables on top of `self`.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by full variable name.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = format!("{}{}", ENV_PREFIX, name);
            lookup(&key).map(|value| (key, value))
        };

        if let Some((key, val)) = var("NUM_EXAMPLES") {
            self.num_examples = parse_env_value(&val, &key)?;
        }
        if let Some((key, val)) = var("MAX_WORKERS") {
            self.max_workers = parse_env_value(&val, &key)?;
        }
        if let Some((_, val)) = var("MODEL") {
            self.model = val;
        }
        if let Some((key, val)) = var("TEMPERATURE") {
            self.temperature = parse_env_value(&val, &key)?;
        }
        if let Some((key, val)) = var("SEED") {
            self.seed = parse_env_value(&val, &key)?;
        }
        if let Some((_, val)) = var("BASE_URL") {
            self.base_url = val;
        }
        if let Some((_, val)) = var("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(val);
        }
        if let Some((_, val)) = var("TRAINING_FILE") {
            self.training_file = val;
        }
        if let Some((_, val)) = var("BENCHMARK_FILE") {
            self.benchmark_file = val;
        }
        if let Some((_, val)) = var("TEMPLATE") {
            self.template_path = Some(PathBuf::from(val));
        }

        Ok(self)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_examples == 0 {
            return Err(ConfigError::ValidationFailed(
                "num_examples must be greater than 0".to_string(),
            ));
        }

        if self.max_workers == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_workers must be greater than 0".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "model cannot be empty".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.training_path() == self.benchmark_path() {
            return Err(ConfigError::ValidationFailed(
                "training_file and benchmark_file must differ".to_string(),
            ));
        }

        Ok(())
    }

    /// Full path of the training sink.
    pub fn training_path(&self) -> PathBuf {
        self.output_dir.join(&self.training_file)
    }

    /// Full path of the benchmark sink.
    pub fn benchmark_path(&self) -> PathBuf {
        self.output_dir.join(&self.benchmark_file)
    }

    /// Builder method to set the number of examples.
    pub fn with_num_examples(mut self, count: usize) -> Self {
        self.num_examples = count;
        self
    }

    /// Builder method to set the worker count.
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }

    /// Builder method to set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder method to set temperature.
    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = temp;
        self
    }

    /// Builder method to set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method to set the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder method to set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Builder method to set the training sink file name.
    pub fn with_training_file(mut self, name: impl Into<String>) -> Self {
        self.training_file = name.into();
        self
    }

    /// Builder method to set the benchmark sink file name.
    pub fn with_benchmark_file(mut self, name: impl Into<String>) -> Self {
        self.benchmark_file = name.into();
        self
    }

    /// Builder method to set a custom template file.
    pub fn with_template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }
}

/// Resolves the API key from an explicit value or a key file.
///
/// Surrounding whitespace is trimmed; an empty result counts as missing.
pub fn resolve_api_key(explicit: Option<&str>, key_file: &Path) -> Result<String, ConfigError> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    let missing = || ConfigError::MissingApiKey(key_file.display().to_string());
    let content = std::fs::read_to_string(key_file).map_err(|_| missing())?;
    let key = content.trim();
    if key.is_empty() {
        return Err(missing());
    }
    Ok(key.to_string())
}

/// Parse an environment variable value into a type.
fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("could not parse '{}'", value),
    })
}
