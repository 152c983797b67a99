//! Rule-based evaluation of assistant replies against benchmark records.

pub mod safety;

pub use safety::{
    SafetyEvaluator, Verdict, CLARIFY_INDICATORS, REFUSE_KEYWORDS, SAFE_COMPLETE_REFUSAL_KEYWORDS,
    SUPPORT_KEYWORDS,
};
