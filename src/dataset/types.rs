//! Record types for generated safety conversations.
//!
//! The same types are used for the payload returned by the generation
//! service, for the persisted benchmark records, and for the training lines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::categories::{AttackPattern, RiskLevel, SafetyCategory};

/// Dataset version stamped on every record.
pub const DATASET_VERSION: &str = "safetybench_v1.0";

/// Prefix for record identifiers.
pub const ID_PREFIX: &str = "SAFETYBENCH_V1";

/// Language tag of generated conversations.
pub const LANGUAGE: &str = "en";

/// Locale of generated conversations.
pub const LOCALE: &str = "en-US";

/// Top-level fields every benchmark record must carry.
pub const REQUIRED_FIELDS: [&str; 12] = [
    "id",
    "version",
    "created_date",
    "category",
    "subcategory",
    "risk_level",
    "language",
    "locale",
    "attack_pattern",
    "messages",
    "expected",
    "notes",
];

/// Builds the record id for a run index, e.g. `SAFETYBENCH_V1_000042`.
pub fn example_id(index: usize) -> String {
    format!("{}_{:06}", ID_PREFIX, index)
}

/// Speaker of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single turn of a generated conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered user/assistant messages.
pub type Conversation = Vec<Message>;

/// Behavior the assistant should exhibit for a user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpectedAction {
    /// Decline and explain why.
    Refuse,
    /// The request is benign; help normally.
    SafeComplete,
    /// Ask for clarification.
    Clarify,
    /// Respond with empathetic support.
    Support,
}

impl ExpectedAction {
    pub const ALL: [ExpectedAction; 4] = [
        ExpectedAction::Refuse,
        ExpectedAction::SafeComplete,
        ExpectedAction::Clarify,
        ExpectedAction::Support,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectedAction::Refuse => "REFUSE",
            ExpectedAction::SafeComplete => "SAFE_COMPLETE",
            ExpectedAction::Clarify => "CLARIFY",
            ExpectedAction::Support => "SUPPORT",
        }
    }
}

impl fmt::Display for ExpectedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpectedAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown expected action '{}'", s))
    }
}

/// Phrases a reply should contain, keyed by expected action.
///
/// Only REFUSE, SUPPORT and SAFE_COMPLETE carry phrase lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MustInclude {
    #[serde(rename = "REFUSE")]
    pub refuse: Vec<String>,
    #[serde(rename = "SUPPORT")]
    pub support: Vec<String>,
    #[serde(rename = "SAFE_COMPLETE")]
    pub safe_complete: Vec<String>,
}

impl MustInclude {
    /// Returns the phrase list for an action name; empty for any other name.
    pub fn phrases_for(&self, action: &str) -> &[String] {
        match action.parse::<ExpectedAction>() {
            Ok(ExpectedAction::Refuse) => &self.refuse,
            Ok(ExpectedAction::Support) => &self.support,
            Ok(ExpectedAction::SafeComplete) => &self.safe_complete,
            Ok(ExpectedAction::Clarify) | Err(_) => &[],
        }
    }
}

/// Grading metadata attached to a conversation.
///
/// Action names are kept as raw strings so that values outside the known
/// vocabulary survive decoding and can be reported by the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedBehavior {
    /// One action per user turn, in order.
    pub expected_action: Vec<String>,
    pub must_include: MustInclude,
    pub must_not_include: Vec<String>,
}

impl ExpectedBehavior {
    /// The action graded by the evaluator: the one for the final user turn.
    pub fn final_action(&self) -> Option<&str> {
        self.expected_action.last().map(String::as_str)
    }

    /// Decodes grading metadata read back from a benchmark file.
    ///
    /// Absent lists and phrase keys are treated as empty and unrecognised
    /// keys are ignored, so hand-edited or older records can still be graded.
    pub fn from_record_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let stored: StoredExpected = serde_json::from_value(value)?;
        Ok(Self {
            expected_action: stored.expected_action,
            must_include: MustInclude {
                refuse: stored.must_include.refuse,
                support: stored.must_include.support,
                safe_complete: stored.must_include.safe_complete,
            },
            must_not_include: stored.must_not_include,
        })
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct StoredMustInclude {
    #[serde(rename = "REFUSE")]
    refuse: Vec<String>,
    #[serde(rename = "SUPPORT")]
    support: Vec<String>,
    #[serde(rename = "SAFE_COMPLETE")]
    safe_complete: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct StoredExpected {
    expected_action: Vec<String>,
    must_include: StoredMustInclude,
    must_not_include: Vec<String>,
}

/// Structured payload returned by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratedPayload {
    pub messages: Conversation,
    pub expected: ExpectedBehavior,
    pub notes: String,
}

/// A complete persisted benchmark record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub id: String,
    pub version: String,
    pub created_date: NaiveDate,
    pub category: SafetyCategory,
    pub subcategory: String,
    pub risk_level: RiskLevel,
    pub language: String,
    pub locale: String,
    pub attack_pattern: Vec<AttackPattern>,
    pub messages: Conversation,
    pub expected: ExpectedBehavior,
    pub notes: String,
}

impl Example {
    /// Number of user-role messages in the conversation.
    pub fn user_turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == Role::User)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_id_is_zero_padded() {
        assert_eq!(example_id(0), "SAFETYBENCH_V1_000000");
        assert_eq!(example_id(42), "SAFETYBENCH_V1_000042");
        assert_eq!(example_id(1_234_567), "SAFETYBENCH_V1_1234567");
    }

    #[test]
    fn test_payload_decodes_schema_shape() {
        let raw = r#"{
            "messages": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"}
            ],
            "expected": {
                "expected_action": ["SAFE_COMPLETE"],
                "must_include": {"REFUSE": [], "SUPPORT": [], "SAFE_COMPLETE": ["hello"]},
                "must_not_include": []
            },
            "notes": "greeting"
        }"#;

        let payload: GeneratedPayload = serde_json::from_str(raw).expect("decode");
        assert_eq!(payload.messages.len(), 2);
        assert_eq!(payload.messages[0].role, Role::User);
        assert_eq!(payload.expected.final_action(), Some("SAFE_COMPLETE"));
        assert_eq!(
            payload.expected.must_include.phrases_for("SAFE_COMPLETE"),
            ["hello".to_string()]
        );
    }

    #[test]
    fn test_payload_rejects_unknown_role_and_extra_fields() {
        let bad_role = r#"{"messages":[{"role":"system","content":"x"}],
            "expected":{"expected_action":[],"must_include":{"REFUSE":[],"SUPPORT":[],"SAFE_COMPLETE":[]},"must_not_include":[]},
            "notes":""}"#;
        assert!(serde_json::from_str::<GeneratedPayload>(bad_role).is_err());

        let extra = r#"{"messages":[],
            "expected":{"expected_action":[],"must_include":{"REFUSE":[],"SUPPORT":[],"SAFE_COMPLETE":[]},"must_not_include":[]},
            "notes":"", "score": 3}"#;
        assert!(serde_json::from_str::<GeneratedPayload>(extra).is_err());

        let missing_notes = r#"{"messages":[],
            "expected":{"expected_action":[],"must_include":{"REFUSE":[],"SUPPORT":[],"SAFE_COMPLETE":[]},"must_not_include":[]}}"#;
        assert!(serde_json::from_str::<GeneratedPayload>(missing_notes).is_err());
    }

    #[test]
    fn test_expected_action_parse() {
        assert_eq!("CLARIFY".parse::<ExpectedAction>(), Ok(ExpectedAction::Clarify));
        assert!("refuse".parse::<ExpectedAction>().is_err());
        assert_eq!(
            serde_json::to_string(&ExpectedAction::SafeComplete).expect("serialize"),
            "\"SAFE_COMPLETE\""
        );
    }

    #[test]
    fn test_record_value_fills_absent_lists() {
        let expected =
            ExpectedBehavior::from_record_value(serde_json::json!({"expected_action": ["REFUSE"]}))
                .expect("decode");
        assert_eq!(expected.final_action(), Some("REFUSE"));
        assert!(expected.must_include.refuse.is_empty());
        assert!(expected.must_not_include.is_empty());

        let expected = ExpectedBehavior::from_record_value(serde_json::json!({
            "expected_action": ["CLARIFY", "REFUSE"],
            "must_include": {"REFUSE": ["can't help"], "CLARIFY": ["which"]}
        }))
        .expect("decode");
        assert_eq!(expected.must_include.phrases_for("REFUSE"), ["can't help"]);
        assert!(expected.must_include.support.is_empty());

        // The generation payload stays strict about the same shape.
        let payload = serde_json::json!({
            "messages": [],
            "expected": {"expected_action": ["REFUSE"]},
            "notes": ""
        });
        assert!(serde_json::from_value::<GeneratedPayload>(payload).is_err());
    }

    #[test]
    fn test_record_value_rejects_wrong_types() {
        let result =
            ExpectedBehavior::from_record_value(serde_json::json!({"expected_action": "REFUSE"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_phrases_for_clarify_and_unknown_are_empty() {
        let must_include = MustInclude {
            refuse: vec!["can't".to_string()],
            support: vec![],
            safe_complete: vec![],
        };
        assert_eq!(must_include.phrases_for("REFUSE").len(), 1);
        assert!(must_include.phrases_for("CLARIFY").is_empty());
        assert!(must_include.phrases_for("ESCALATE").is_empty());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("ok")).expect("serialize");
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }
}
