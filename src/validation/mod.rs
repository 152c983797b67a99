//! Validation modules for safety-forge.
//!
//! This module provides structural checks for conversations and schema
//! validation for assembled examples and records read back from disk.

pub mod conversation;
pub mod schema_validator;

pub use conversation::{expected_role, validate_messages, MIN_MESSAGES};
pub use schema_validator::{
    validate_example, validate_expected, validate_record_value, BenchmarkValidationReport,
    RecordIssue,
};
