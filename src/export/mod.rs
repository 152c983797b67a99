//! Export module for generated datasets.
//!
//! Provides the JSONL training and benchmark sinks and reading benchmark
//! files back for validation and scoring.

pub mod jsonl;

pub use jsonl::{find_record, load_benchmark, load_benchmark_lines, DatasetSinks, JsonlSink};
