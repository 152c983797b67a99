//! Command-line interface for safety-forge.
//!
//! Provides commands for dataset generation, benchmark validation, reply
//! scoring and prompt preview.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, Cli, Commands};
