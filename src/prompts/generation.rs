//! Instruction template for safety conversation generation.
//!
//! The template carries `%NAME%` placeholders that the [`PromptCompiler`]
//! replaces with the sampled scenario and a handful of diversity seeds.

use std::path::Path;

use rand::seq::index;
use rand_chacha::ChaCha8Rng;

use crate::error::PromptError;
use crate::generator::ScenarioParameters;
use crate::prompts::seeds::USER_FIRST_PROMPTS;

pub const CATEGORY_PLACEHOLDER: &str = "%CATEGORY%";
pub const SUBCATEGORY_PLACEHOLDER: &str = "%SUBCATEGORY%";
pub const RISK_LEVEL_PLACEHOLDER: &str = "%RISK_LEVEL%";
pub const ATTACK_PATTERNS_PLACEHOLDER: &str = "%ATTACK_PATTERNS%";
pub const USER_FIRST_PROMPTS_PLACEHOLDER: &str = "%USER_FIRST_PROMPTS%";

/// Every placeholder a template must contain.
pub const REQUIRED_PLACEHOLDERS: [&str; 5] = [
    CATEGORY_PLACEHOLDER,
    SUBCATEGORY_PLACEHOLDER,
    RISK_LEVEL_PLACEHOLDER,
    ATTACK_PATTERNS_PLACEHOLDER,
    USER_FIRST_PROMPTS_PLACEHOLDER,
];

/// Number of diversity seeds shown per example.
pub const SEEDS_PER_PROMPT: usize = 5;

/// Built-in generation instructions.
pub const SAFETY_GENERATION_TEMPLATE: &str = r#"You are a Safety SFT Data Generator. Generate ONE multi-turn conversation between a user and an assistant for supervised fine-tuning, teaching the assistant to handle unsafe/harmful requests safely.

SCENARIO ASSIGNMENT (use these exactly):
- Category: %CATEGORY%
- Subcategory: %SUBCATEGORY%
- Risk Level: %RISK_LEVEL%
- Attack Patterns to use: %ATTACK_PATTERNS%

LANGUAGE: English only (en-US).

DIALOGUE REQUIREMENTS:
- Output a JSON object with a "messages" array containing 4-10 items.
- Messages MUST alternate: user, assistant, user, assistant, ...
- First message must be from "user", last message must be from "assistant".
- Each message must have "role" (user/assistant) and "content" (string).
- The conversation must be natural and coherent, with mild escalation across turns.
- No emojis.

SAFETY SCENARIO:
The user attempts harmful requests using the assigned attack patterns. The assistant must:
1. Refuse clearly (brief and firm).
2. Give a short, high-level reason (no technical detail).
3. Offer safe alternatives when appropriate.
4. Never provide actionable harmful details.

RISK LEVEL GUIDELINES:
- L (Low): Borderline requests, could be legitimate with context
- M (Medium): Clearly problematic but using obfuscation
- H (High): Direct harmful requests, obvious policy violations

EXPECTED ACTION (one entry per user turn, in order):
- REFUSE: The assistant should decline and explain why
- SAFE_COMPLETE: The request is actually safe/benign, assistant should help
- CLARIFY: The assistant should ask for clarification
- SUPPORT: For sensitive topics like self-harm, provide empathetic support

STRICT SAFETY CONSTRAINTS:
- User turns may express harmful intent but MUST NOT include actionable instructions.
- Assistant turns must NEVER provide actionable harmful details.
- Do not use real personal data; use placeholders.
- Refusals must sound natural, concise, and firm.

DIVERSITY SEEDS (use as inspiration for first user message):
%USER_FIRST_PROMPTS%

OUTPUT:
Return valid JSON with "messages", "expected", and "notes" fields."#;

/// Renders scenario parameters into a generation instruction.
#[derive(Debug, Clone)]
pub struct PromptCompiler {
    template: String,
    seeds: Vec<String>,
}

impl PromptCompiler {
    /// Creates a compiler after checking that every placeholder is present.
    ///
    /// # Errors
    ///
    /// Returns `PromptError::MissingPlaceholder` for the first absent placeholder.
    pub fn new<I, S>(template: impl Into<String>, seeds: I) -> Result<Self, PromptError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let template = template.into();
        check_template(&template)?;
        Ok(Self {
            template,
            seeds: seeds.into_iter().map(Into::into).collect(),
        })
    }

    /// Compiler with the built-in template and seed pool.
    pub fn builtin() -> Self {
        Self {
            template: SAFETY_GENERATION_TEMPLATE.to_string(),
            seeds: USER_FIRST_PROMPTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Loads a custom template from disk, keeping the built-in seed pool.
    pub fn from_template_file(path: impl AsRef<Path>) -> Result<Self, PromptError> {
        let template = std::fs::read_to_string(path)?;
        Self::new(template, USER_FIRST_PROMPTS.iter().copied())
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn seed_pool_size(&self) -> usize {
        self.seeds.len()
    }

    /// Draws up to [`SEEDS_PER_PROMPT`] distinct seeds from the task's stream.
    pub fn select_seeds(&self, rng: &mut ChaCha8Rng) -> Vec<&str> {
        let amount = SEEDS_PER_PROMPT.min(self.seeds.len());
        index::sample(rng, self.seeds.len(), amount)
            .into_iter()
            .map(|i| self.seeds[i].as_str())
            .collect()
    }

    /// Produces the instruction for one example.
    ///
    /// `rng` must be the stream the scenario was sampled from, so the seed
    /// selection is reproducible for the example index.
    pub fn compile(&self, params: &ScenarioParameters, rng: &mut ChaCha8Rng) -> String {
        let seeds = self.select_seeds(rng).join("\n");

        self.template
            .replace(CATEGORY_PLACEHOLDER, params.category.as_str())
            .replace(SUBCATEGORY_PLACEHOLDER, &params.subcategory)
            .replace(RISK_LEVEL_PLACEHOLDER, params.risk_level.code())
            .replace(ATTACK_PATTERNS_PLACEHOLDER, &params.attack_patterns_joined())
            .replace(USER_FIRST_PROMPTS_PLACEHOLDER, &seeds)
    }
}

impl Default for PromptCompiler {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Checks that a template contains every required placeholder.
pub fn check_template(template: &str) -> Result<(), PromptError> {
    match REQUIRED_PLACEHOLDERS
        .iter()
        .find(|placeholder| !template.contains(*placeholder))
    {
        Some(missing) => Err(PromptError::MissingPlaceholder(missing)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{AttackPattern, RiskLevel, SafetyCategory};
    use crate::generator::ScenarioSampler;

    fn params() -> ScenarioParameters {
        ScenarioParameters {
            category: SafetyCategory::CrimeFraud,
            subcategory: "money laundering".to_string(),
            risk_level: RiskLevel::Medium,
            attack_patterns: vec![AttackPattern::FictionalContext, AttackPattern::FalseAuthority],
        }
    }

    #[test]
    fn test_builtin_template_has_all_placeholders() {
        assert!(check_template(SAFETY_GENERATION_TEMPLATE).is_ok());
    }

    #[test]
    fn test_missing_placeholder_is_rejected() {
        let template = SAFETY_GENERATION_TEMPLATE.replace(RISK_LEVEL_PLACEHOLDER, "M");
        let err = PromptCompiler::new(template, ["hi"]).unwrap_err();
        assert!(matches!(
            err,
            PromptError::MissingPlaceholder(RISK_LEVEL_PLACEHOLDER)
        ));
    }

    #[test]
    fn test_compile_substitutes_every_placeholder() {
        let compiler = PromptCompiler::builtin();
        let mut rng = ScenarioSampler::default().rng_for(3);
        let prompt = compiler.compile(&params(), &mut rng);

        for placeholder in REQUIRED_PLACEHOLDERS {
            assert!(!prompt.contains(placeholder), "{} left in prompt", placeholder);
        }
        assert!(prompt.contains("- Category: crime_fraud"));
        assert!(prompt.contains("- Subcategory: money laundering"));
        assert!(prompt.contains("- Risk Level: M"));
        assert!(prompt.contains("- Attack Patterns to use: fictional_context, false_authority"));
    }

    #[test]
    fn test_seed_selection_is_bounded_and_distinct() {
        let compiler = PromptCompiler::builtin();
        let mut rng = ScenarioSampler::default().rng_for(0);
        let seeds = compiler.select_seeds(&mut rng);
        assert_eq!(seeds.len(), SEEDS_PER_PROMPT);

        let mut sorted = seeds.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), SEEDS_PER_PROMPT);
    }

    #[test]
    fn test_small_pool_uses_every_seed() {
        let compiler =
            PromptCompiler::new(SAFETY_GENERATION_TEMPLATE, ["hola", "bonjour"]).expect("valid");
        let mut rng = ScenarioSampler::default().rng_for(9);
        let mut seeds = compiler.select_seeds(&mut rng);
        seeds.sort();
        assert_eq!(seeds, vec!["bonjour", "hola"]);
    }

    #[test]
    fn test_compile_is_reproducible_for_an_index() {
        let compiler = PromptCompiler::builtin();
        let sampler = ScenarioSampler::default();

        let render = |index: usize| {
            let mut rng = sampler.rng_for(index);
            let params = ScenarioSampler::sample_with(&mut rng);
            compiler.compile(&params, &mut rng)
        };

        assert_eq!(render(21), render(21));
    }

    #[test]
    fn test_custom_template_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("template.txt");
        std::fs::write(
            &path,
            "%CATEGORY%|%SUBCATEGORY%|%RISK_LEVEL%|%ATTACK_PATTERNS%|%USER_FIRST_PROMPTS%\n",
        )
        .expect("write template");

        let compiler = PromptCompiler::from_template_file(&path).expect("load");
        let mut rng = ScenarioSampler::default().rng_for(1);
        let prompt = compiler.compile(&params(), &mut rng);
        assert!(prompt.starts_with("crime_fraud|money laundering|M|fictional_context, false_authority|"));
    }

    #[test]
    fn test_template_file_is_used_verbatim() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("template.txt");
        let raw = "\n  %CATEGORY% %SUBCATEGORY% %RISK_LEVEL% %ATTACK_PATTERNS% %USER_FIRST_PROMPTS%  \n\n";
        std::fs::write(&path, raw).expect("write template");

        let compiler = PromptCompiler::from_template_file(&path).expect("load");
        assert_eq!(compiler.template(), raw);
    }
}
