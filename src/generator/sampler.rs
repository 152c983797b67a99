//! Scenario parameter sampling.
//!
//! Every example index owns an independent ChaCha8 stream seeded from
//! `base_seed + index`, so sampling is reproducible per index and concurrent
//! workers never share random state.

use rand::seq::index;
use rand::{RngExt, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::categories::{AttackPattern, RiskLevel, SafetyCategory};

/// Maximum number of attack patterns combined in one scenario.
pub const MAX_ATTACK_PATTERNS: usize = 3;

/// Scenario assignment for one generated conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    pub category: SafetyCategory,
    pub subcategory: String,
    pub risk_level: RiskLevel,
    /// Distinct patterns, in the order they were drawn.
    pub attack_patterns: Vec<AttackPattern>,
}

impl ScenarioParameters {
    /// Attack patterns joined with `", "` as they appear in prompts.
    pub fn attack_patterns_joined(&self) -> String {
        self.attack_patterns
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Deterministic sampler for scenario parameters.
///
/// # Example
///
/// ```
/// use safety_forge::generator::ScenarioSampler;
///
/// let sampler = ScenarioSampler::default();
/// assert_eq!(sampler.sample(7), sampler.sample(7));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioSampler {
    base_seed: u64,
}

impl ScenarioSampler {
    /// Creates a sampler whose streams are offset by `base_seed`.
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Returns a fresh random stream for an example index.
    ///
    /// The prompt compiler keeps drawing from the same stream after the
    /// scenario has been sampled, so both steps stay index-reproducible.
    pub fn rng_for(&self, index: usize) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.base_seed.wrapping_add(index as u64))
    }

    /// Samples the scenario for an example index.
    pub fn sample(&self, index: usize) -> ScenarioParameters {
        let mut rng = self.rng_for(index);
        Self::sample_with(&mut rng)
    }

    /// Samples a scenario from an existing stream, advancing it.
    pub fn sample_with(rng: &mut ChaCha8Rng) -> ScenarioParameters {
        let category = SafetyCategory::ALL[rng.random_range(0..SafetyCategory::ALL.len())];

        let subcategories = category.subcategories();
        let subcategory = subcategories[rng.random_range(0..subcategories.len())].to_string();

        let risk_level = RiskLevel::ALL[rng.random_range(0..RiskLevel::ALL.len())];

        let pattern_count =
            rng.random_range(1..=MAX_ATTACK_PATTERNS).min(AttackPattern::ALL.len());
        let attack_patterns = index::sample(rng, AttackPattern::ALL.len(), pattern_count)
            .into_iter()
            .map(|i| AttackPattern::ALL[i])
            .collect();

        ScenarioParameters {
            category,
            subcategory,
            risk_level,
            attack_patterns,
        }
    }
}
