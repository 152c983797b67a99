//! Scenario taxonomy for safety conversations.
//!
//! Harm categories, risk levels and attack patterns used by the scenario sampler.

mod taxonomy;

pub use taxonomy::{AttackPattern, RiskLevel, SafetyCategory};
