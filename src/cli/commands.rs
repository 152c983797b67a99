//! CLI command definitions for safety-forge.
//!
//! This module provides the command-line interface for generating safety
//! conversation datasets, re-validating benchmark files, scoring replies, and
//! previewing compiled prompts.

use crate::dataset::ExpectedBehavior;
use crate::evaluation::{SafetyEvaluator, Verdict};
use crate::export::{find_record, load_benchmark, load_benchmark_lines};
use crate::generator::{prepare_prompt, ScenarioParameters, ScenarioSampler};
use crate::llm::{LiteLlmClient, LlmProvider, OpenRouterProvider};
use crate::pipeline::{
    resolve_api_key, GenerationConfig, GenerationOrchestrator, GenerationSummary,
    DEFAULT_API_KEY_FILE, DEFAULT_BENCHMARK_FILE,
};
use crate::prompts::PromptCompiler;
use crate::validation::BenchmarkValidationReport;
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Safety SFT conversation generator and rule-based evaluator.
#[derive(Parser)]
#[command(name = "safety-forge")]
#[command(about = "Generate and grade synthetic safety conversations")]
#[command(version)]
#[command(
    long_about = "safety-forge generates multi-turn safety conversations with an LLM, writes a training file and a benchmark file, and grades candidate replies against benchmark records.\n\nExample usage:\n  safety-forge generate --count 100 --workers 10 --output ./data"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate conversations and write the training and benchmark files.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Re-validate every record of a benchmark file.
    Validate(ValidateArgs),

    /// Score one candidate reply against one benchmark record.
    Check(CheckArgs),

    /// Print the sampled scenario and compiled prompt for an index.
    Preview(PreviewArgs),
}

/// Arguments for `safety-forge generate`.
///
/// Unset flags fall back to the config file, then `SAFETY_FORGE_*`
/// environment variables, then built-in defaults.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// YAML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of examples to generate.
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Maximum number of concurrent requests.
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Model identifier.
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Sampling temperature (0.0 - 2.0).
    #[arg(short = 't', long)]
    pub temperature: Option<f64>,

    /// Base seed added to every example index.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output directory for both files.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Training file name.
    #[arg(long)]
    pub training_file: Option<String>,

    /// Benchmark file name.
    #[arg(long)]
    pub benchmark_file: Option<String>,

    /// Custom instruction template file.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// OpenAI-compatible API base URL.
    #[arg(long)]
    pub base_url: Option<String>,

    /// OpenRouter API key (can also be set via OPENROUTER_API_KEY env var).
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// File holding the API key, used when no key is given directly.
    #[arg(long, default_value = DEFAULT_API_KEY_FILE)]
    pub api_key_file: PathBuf,

    /// Print the run summary as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

impl GenerateArgs {
    /// Resolves the run configuration: defaults, file, environment, then flags.
    pub fn resolve_config(&self) -> anyhow::Result<GenerationConfig> {
        let mut config = match &self.config {
            Some(path) => GenerationConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
            None => GenerationConfig::default(),
        }
        .with_env_overrides()?;

        if let Some(count) = self.count {
            config = config.with_num_examples(count);
        }
        if let Some(workers) = self.workers {
            config = config.with_max_workers(workers);
        }
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(temperature) = self.temperature {
            config = config.with_temperature(temperature);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(output) = &self.output {
            config = config.with_output_dir(output.clone());
        }
        if let Some(name) = &self.training_file {
            config = config.with_training_file(name.clone());
        }
        if let Some(name) = &self.benchmark_file {
            config = config.with_benchmark_file(name.clone());
        }
        if let Some(template) = &self.template {
            config = config.with_template_path(template.clone());
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

/// Arguments for `safety-forge validate`.
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Benchmark JSONL file to check.
    #[arg(default_value = DEFAULT_BENCHMARK_FILE)]
    pub file: PathBuf,

    /// Output the report as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `safety-forge check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Benchmark JSONL file holding the record.
    #[arg(short = 'b', long, default_value = DEFAULT_BENCHMARK_FILE)]
    pub benchmark: PathBuf,

    /// Record id, e.g. SAFETYBENCH_V1_000042.
    #[arg(long)]
    pub id: String,

    /// Candidate assistant reply to grade.
    #[arg(short = 'r', long)]
    pub reply: String,

    /// Output the verdict as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `safety-forge preview`.
#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Example index to preview.
    #[arg(short = 'i', long, default_value = "0")]
    pub index: usize,

    /// Base seed added to the index.
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Custom instruction template file.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Output the scenario and prompt as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Parse CLI arguments and return the Cli struct.
///
/// This allows main.rs to access CLI arguments (like log_level) before running commands.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
///
/// This is the main entry point for the safety-forge CLI.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => run_generate_command(args).await,
        Commands::Validate(args) => run_validate_command(args),
        Commands::Check(args) => run_check_command(args),
        Commands::Preview(args) => run_preview_command(args),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn run_generate_command(args: GenerateArgs) -> anyhow::Result<()> {
    let config = args.resolve_config()?;
    let provider = build_llm_client(&args, &config)?;

    let orchestrator = GenerationOrchestrator::from_config(&config, provider)?;
    let summary = orchestrator.run(config.num_examples).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Picks OpenRouter when an API key resolves, else a LiteLLM gateway from
/// `LITELLM_API_BASE`.
fn build_llm_client(
    args: &GenerateArgs,
    config: &GenerationConfig,
) -> anyhow::Result<Arc<dyn LlmProvider>> {
    match resolve_api_key(args.api_key.as_deref(), &args.api_key_file) {
        Ok(api_key) => {
            let provider = OpenRouterProvider::with_custom_url(
                api_key,
                config.base_url.clone(),
                config.model.clone(),
            )?;
            info!(
                base_url = provider.base_url(),
                api_key = %provider.api_key_masked(),
                model = %config.model,
                "Using OpenRouter"
            );
            Ok(Arc::new(provider))
        }
        Err(key_error) => {
            let client = LiteLlmClient::from_env().map_err(|e| {
                anyhow::anyhow!("{key_error}; LiteLLM fallback unavailable: {e}")
            })?;
            info!(api_base = client.api_base(), "Using LiteLLM client from environment");
            Ok(Arc::new(client))
        }
    }
}

fn print_summary(summary: &GenerationSummary) {
    println!("\n=== Generation Results ===");
    println!("Run id:     {}", summary.run_id);
    println!("Requested:  {}", summary.requested);
    println!("Saved:      {}", summary.succeeded);
    println!("Failed:     {}", summary.failed);
    for (kind, count) in &summary.failures_by_kind {
        println!("  {kind:<10}{count}");
    }
    println!("Duration:   {:.1}s", summary.duration_ms as f64 / 1000.0);
    println!("Training:   {}", summary.training_path.display());
    println!("Benchmark:  {}", summary.benchmark_path.display());
}

fn run_validate_command(args: ValidateArgs) -> anyhow::Result<()> {
    let records = load_benchmark_lines(&args.file)?;
    let report = BenchmarkValidationReport::from_numbered_records(&records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Checked {} records: {} valid, {} invalid",
            report.total,
            report.valid,
            report.invalid()
        );
        for issue in &report.issues {
            println!(
                "  line {} [{}]: {}",
                issue.line,
                issue.id.as_deref().unwrap_or("?"),
                issue.message
            );
        }
    }

    if !report.is_valid() {
        anyhow::bail!(
            "{} of {} records in {} failed validation",
            report.invalid(),
            report.total,
            args.file.display()
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct CheckOutput<'a> {
    id: &'a str,
    score: u8,
    verdict: Verdict,
}

fn run_check_command(args: CheckArgs) -> anyhow::Result<()> {
    let records = load_benchmark(&args.benchmark)?;
    let record = find_record(&records, &args.id).with_context(|| {
        format!("No record with id '{}' in {}", args.id, args.benchmark.display())
    })?;
    let expected = ExpectedBehavior::from_record_value(
        record
            .get("expected")
            .cloned()
            .with_context(|| format!("Record '{}' has no expected field", args.id))?,
    )
    .with_context(|| format!("Record '{}' has a malformed expected field", args.id))?;

    let verdict = SafetyEvaluator::new().judge(&expected, &args.reply);
    let score = verdict.score();

    if args.json {
        let output = CheckOutput {
            id: &args.id,
            score,
            verdict,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{score}");
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct PreviewOutput {
    index: usize,
    seed: u64,
    scenario: ScenarioParameters,
    prompt: String,
}

fn run_preview_command(args: PreviewArgs) -> anyhow::Result<()> {
    let compiler = match &args.template {
        Some(path) => PromptCompiler::from_template_file(path)
            .with_context(|| format!("Failed to load template {}", path.display()))?,
        None => PromptCompiler::builtin(),
    };
    let prepared = prepare_prompt(&ScenarioSampler::new(args.seed), &compiler, args.index);

    if args.json {
        let output = PreviewOutput {
            index: args.index,
            seed: args.seed,
            scenario: prepared.params,
            prompt: prepared.instruction,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Index:           {}", args.index);
        println!("Category:        {}", prepared.params.category);
        println!("Subcategory:     {}", prepared.params.subcategory);
        println!("Risk level:      {}", prepared.params.risk_level);
        println!("Attack patterns: {}", prepared.params.attack_patterns_joined());
        println!("\n{}", prepared.instruction);
    }
    Ok(())
}
