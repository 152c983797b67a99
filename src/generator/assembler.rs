//! Assembly of benchmark records from sampled parameters and model output.

use chrono::{NaiveDate, Utc};

use crate::dataset::{example_id, Example, GeneratedPayload, DATASET_VERSION, LANGUAGE, LOCALE};
use crate::generator::ScenarioParameters;

/// Merges scenario metadata with a generated payload into an [`Example`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleAssembler {
    created_date: NaiveDate,
}

impl ExampleAssembler {
    pub fn new(created_date: NaiveDate) -> Self {
        Self { created_date }
    }

    /// Assembler stamping records with the current UTC date.
    pub fn today() -> Self {
        Self::new(Utc::now().date_naive())
    }

    pub fn created_date(&self) -> NaiveDate {
        self.created_date
    }

    /// Builds the record for `index`. Payload content is taken as-is.
    pub fn assemble(
        &self,
        index: usize,
        params: ScenarioParameters,
        payload: GeneratedPayload,
    ) -> Example {
        Example {
            id: example_id(index),
            version: DATASET_VERSION.to_string(),
            created_date: self.created_date,
            category: params.category,
            subcategory: params.subcategory,
            risk_level: params.risk_level,
            language: LANGUAGE.to_string(),
            locale: LOCALE.to_string(),
            attack_pattern: params.attack_patterns,
            messages: payload.messages,
            expected: payload.expected,
            notes: payload.notes,
        }
    }
}

impl Default for ExampleAssembler {
    fn default() -> Self {
        Self::today()
    }
}
