//! Schema validation for benchmark records.
//!
//! This module validates assembled examples and records read back from disk,
//! checking for required fields, legal action names, and consistency between
//! the conversation and its expected actions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dataset::{Example, ExpectedAction, ExpectedBehavior, REQUIRED_FIELDS};
use crate::error::ValidationError;
use crate::validation::conversation::validate_messages;

/// Validates an assembled example.
///
/// Runs the conversation check, then requires every expected action to be a
/// known name and one action per user turn.
pub fn validate_example(example: &Example) -> Result<(), ValidationError> {
    validate_messages(&example.messages)?;
    validate_expected(&example.expected, example.user_turns())
}

/// Checks action names and the action count against the number of user turns.
pub fn validate_expected(
    expected: &ExpectedBehavior,
    user_turns: usize,
) -> Result<(), ValidationError> {
    if let Some(unknown) = expected
        .expected_action
        .iter()
        .find(|action| action.parse::<ExpectedAction>().is_err())
    {
        return Err(ValidationError::InvalidAction(unknown.clone()));
    }

    if expected.expected_action.len() != user_turns {
        return Err(ValidationError::ActionCountMismatch {
            actions: expected.expected_action.len(),
            user_turns,
        });
    }

    Ok(())
}

/// Validates an untyped record and returns the decoded example.
///
/// Missing top-level fields are reported by name before any decoding is
/// attempted.
pub fn validate_record_value(record: &Value) -> Result<Example, ValidationError> {
    let object = record
        .as_object()
        .ok_or_else(|| ValidationError::SchemaError("record is not a JSON object".to_string()))?;

    if let Some(missing) = REQUIRED_FIELDS
        .iter()
        .find(|field| !object.contains_key(**field))
    {
        return Err(ValidationError::MissingField((*missing).to_string()));
    }

    let example: Example = serde_json::from_value(record.clone())
        .map_err(|e| ValidationError::SchemaError(e.to_string()))?;
    validate_example(&example)?;
    Ok(example)
}

/// A record that failed validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordIssue {
    /// 1-based line number in the source file.
    pub line: usize,
    /// Record id, when one could be read.
    pub id: Option<String>,
    /// Description of the validation error.
    pub message: String,
}

/// Result of validating every record of a benchmark file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkValidationReport {
    /// Number of records checked.
    pub total: usize,
    /// Number of records that passed.
    pub valid: usize,
    /// Failures, in file order.
    pub issues: Vec<RecordIssue>,
}

impl BenchmarkValidationReport {
    /// Validates records in order, numbering them by position from 1.
    pub fn from_records(records: &[Value]) -> Self {
        let numbered: Vec<(usize, Value)> = records
            .iter()
            .cloned()
            .enumerate()
            .map(|(offset, record)| (offset + 1, record))
            .collect();
        Self::from_numbered_records(&numbered)
    }

    /// Validates records that carry their own source line numbers.
    pub fn from_numbered_records(records: &[(usize, Value)]) -> Self {
        let mut report = Self::default();
        for (line, record) in records {
            report.total += 1;
            match validate_record_value(record) {
                Ok(_) => report.valid += 1,
                Err(e) => report.issues.push(RecordIssue {
                    line: *line,
                    id: record
                        .get("id")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    message: e.to_string(),
                }),
            }
        }
        report
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn invalid(&self) -> usize {
        self.issues.len()
    }
}
