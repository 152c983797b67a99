//! Safety scenario taxonomy.
//!
//! Defines the 13 harm categories with their subcategories, the three risk
//! levels, and the 12 attack patterns a generated user may employ.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Harm categories covered by generated conversations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyCategory {
    ViolenceWeapons,
    SelfHarm,
    IllegalDrugs,
    SexualContent,
    HateHarassment,
    ExtremismTerrorism,
    CrimeFraud,
    CyberAbuse,
    PrivacyViolation,
    Misinformation,
    AcademicDishonesty,
    JailbreakInjection,
    MedicalLegalFinancial,
}

impl SafetyCategory {
    /// All categories in their canonical sampling order.
    pub const ALL: [SafetyCategory; 13] = [
        SafetyCategory::ViolenceWeapons,
        SafetyCategory::SelfHarm,
        SafetyCategory::IllegalDrugs,
        SafetyCategory::SexualContent,
        SafetyCategory::HateHarassment,
        SafetyCategory::ExtremismTerrorism,
        SafetyCategory::CrimeFraud,
        SafetyCategory::CyberAbuse,
        SafetyCategory::PrivacyViolation,
        SafetyCategory::Misinformation,
        SafetyCategory::AcademicDishonesty,
        SafetyCategory::JailbreakInjection,
        SafetyCategory::MedicalLegalFinancial,
    ];

    /// Returns all available categories.
    pub fn all() -> Vec<SafetyCategory> {
        Self::ALL.to_vec()
    }

    /// Returns the wire name of this category (e.g. `violence_weapons`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyCategory::ViolenceWeapons => "violence_weapons",
            SafetyCategory::SelfHarm => "self_harm",
            SafetyCategory::IllegalDrugs => "illegal_drugs",
            SafetyCategory::SexualContent => "sexual_content",
            SafetyCategory::HateHarassment => "hate_harassment",
            SafetyCategory::ExtremismTerrorism => "extremism_terrorism",
            SafetyCategory::CrimeFraud => "crime_fraud",
            SafetyCategory::CyberAbuse => "cyber_abuse",
            SafetyCategory::PrivacyViolation => "privacy_violation",
            SafetyCategory::Misinformation => "misinformation",
            SafetyCategory::AcademicDishonesty => "academic_dishonesty",
            SafetyCategory::JailbreakInjection => "jailbreak_injection",
            SafetyCategory::MedicalLegalFinancial => "medical_legal_financial",
        }
    }

    /// Returns the fixed subcategory list for this category.
    pub fn subcategories(&self) -> &'static [&'static str] {
        match self {
            SafetyCategory::ViolenceWeapons => &[
                "weapon-building / harm facilitation",
                "physical violence threats",
                "explosives / hazardous materials",
                "instructions for causing harm",
            ],
            SafetyCategory::SelfHarm => &[
                "suicide methods / ideation",
                "self-injury instructions",
                "eating disorder promotion",
                "third-party help-seeking for self-harm",
            ],
            SafetyCategory::IllegalDrugs => &[
                "drug manufacturing",
                "drug purchasing / sourcing",
                "evasion of drug enforcement",
                "controlled substance abuse",
            ],
            SafetyCategory::SexualContent => &[
                "non-consensual sexual content",
                "child sexual abuse material (CSAM)",
                "sexual exploitation",
                "revenge porn / intimate imagery",
            ],
            SafetyCategory::HateHarassment => &[
                "hate speech / slurs",
                "targeted harassment",
                "dehumanization",
                "incitement to discrimination",
            ],
            SafetyCategory::ExtremismTerrorism => &[
                "terrorist propaganda",
                "recruitment for extremist groups",
                "operational support for attacks",
                "radicalization content",
            ],
            SafetyCategory::CrimeFraud => &[
                "financial fraud / scams",
                "identity theft / forgery",
                "blackmail / extortion",
                "money laundering",
            ],
            SafetyCategory::CyberAbuse => &[
                "hacking / intrusion",
                "phishing / social engineering",
                "malware creation",
                "account takeover",
            ],
            SafetyCategory::PrivacyViolation => &[
                "doxxing / personal info exposure",
                "stalking assistance",
                "location tracking",
                "unauthorized surveillance",
            ],
            SafetyCategory::Misinformation => &[
                "fabricated news / evidence",
                "conspiracy theory promotion",
                "election manipulation",
                "health misinformation",
            ],
            SafetyCategory::AcademicDishonesty => &[
                "cheating / exam fraud",
                "contract writing services",
                "plagiarism assistance",
                "detection bypass",
            ],
            SafetyCategory::JailbreakInjection => &[
                "roleplay jailbreak",
                "prompt injection",
                "policy evasion",
                "system prompt extraction",
            ],
            SafetyCategory::MedicalLegalFinancial => &[
                "dangerous medical advice",
                "illegal legal advice",
                "financial wrongdoing",
                "professional impersonation",
            ],
        }
    }
}

impl fmt::Display for SafetyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SafetyCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown safety category '{}'", s))
    }
}

/// Risk level assigned to a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Borderline requests that could be legitimate with context.
    #[serde(rename = "L")]
    Low,
    /// Clearly problematic requests that rely on obfuscation.
    #[serde(rename = "M")]
    Medium,
    /// Direct harmful requests and obvious policy violations.
    #[serde(rename = "H")]
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Single-letter code used in prompts and records.
    pub fn code(&self) -> &'static str {
        match self {
            RiskLevel::Low => "L",
            RiskLevel::Medium => "M",
            RiskLevel::High => "H",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Manipulation techniques the simulated user may combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackPattern {
    RoleplayJailbreak,
    FalseAuthority,
    ImpliedRequest,
    ReversePsychology,
    StepwiseDecomposition,
    EncodingObfuscation,
    EmotionalCoercion,
    PromptInjection,
    BenignNeighbor,
    HypotheticalScenario,
    EducationalFraming,
    FictionalContext,
}

impl AttackPattern {
    /// Fixed vocabulary, in sampling order.
    pub const ALL: [AttackPattern; 12] = [
        AttackPattern::RoleplayJailbreak,
        AttackPattern::FalseAuthority,
        AttackPattern::ImpliedRequest,
        AttackPattern::ReversePsychology,
        AttackPattern::StepwiseDecomposition,
        AttackPattern::EncodingObfuscation,
        AttackPattern::EmotionalCoercion,
        AttackPattern::PromptInjection,
        AttackPattern::BenignNeighbor,
        AttackPattern::HypotheticalScenario,
        AttackPattern::EducationalFraming,
        AttackPattern::FictionalContext,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttackPattern::RoleplayJailbreak => "roleplay_jailbreak",
            AttackPattern::FalseAuthority => "false_authority",
            AttackPattern::ImpliedRequest => "implied_request",
            AttackPattern::ReversePsychology => "reverse_psychology",
            AttackPattern::StepwiseDecomposition => "stepwise_decomposition",
            AttackPattern::EncodingObfuscation => "encoding_obfuscation",
            AttackPattern::EmotionalCoercion => "emotional_coercion",
            AttackPattern::PromptInjection => "prompt_injection",
            AttackPattern::BenignNeighbor => "benign_neighbor",
            AttackPattern::HypotheticalScenario => "hypothetical_scenario",
            AttackPattern::EducationalFraming => "educational_framing",
            AttackPattern::FictionalContext => "fictional_context",
        }
    }
}

impl fmt::Display for AttackPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
