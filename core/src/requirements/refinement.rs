use super::classifier::classify_into_set;
use super::model::RequirementSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Some(Answer::Yes),
            "no" | "n" => Some(Answer::No),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RefinementRule {
    pub keyword: &'static str,
    pub question: &'static str,
    pub options: [&'static str; 2],
    pub implied_requirement: &'static str,
}

pub const REFINEMENT_RULES: [RefinementRule; 4] = [
    RefinementRule {
        keyword: "secure",
        question: "Does 'secure' mean two-factor authentication?",
        options: ["Yes", "No"],
        implied_requirement: "Implement two-factor authentication for user login.",
    },
    RefinementRule {
        keyword: "fast",
        question: "Should the system prioritize low latency (under 2 seconds)?",
        options: ["Yes", "No"],
        implied_requirement: "Load time must be under 2 seconds for transactions.",
    },
    RefinementRule {
        keyword: "fraud",
        question: "Should the system monitor transactions in real-time for fraud detection?",
        options: ["Yes", "No"],
        implied_requirement: "System must monitor transactions in real-time.",
    },
    RefinementRule {
        keyword: "payment",
        question: "Should the payment system comply with PCI-DSS standards?",
        options: ["Yes", "No"],
        implied_requirement: "Must comply with PCI-DSS for payment security.",
    },
];

/// Rules whose keyword occurs (case-insensitively) in `text`, in table order.
pub fn detect_triggers(text: &str) -> Vec<&'static RefinementRule> {
    let lower = text.to_lowercase();
    REFINEMENT_RULES
        .iter()
        .filter(|r| lower.contains(r.keyword))
        .collect()
}

/// Appends the implied requirement of every `asked` rule answered "Yes" and
/// re-classifies the updated text. Answers for keywords that were not asked
/// are ignored; with no accepted answers the set is returned unchanged.
pub fn apply_refinement(
    set: &RequirementSet,
    asked: &[&RefinementRule],
    answers: &[(String, Answer)],
) -> RequirementSet {
    let additions: Vec<&str> = asked
        .iter()
        .filter(|r| {
            answers
                .iter()
                .any(|(k, a)| *a == Answer::Yes && k.trim().eq_ignore_ascii_case(r.keyword))
        })
        .map(|r| r.implied_requirement)
        .collect();
    if additions.is_empty() {
        return set.clone();
    }
    tracing::debug!(added = additions.len(), "appending refinement requirements");
    let text = format!("{}\n{}", set.raw_text, additions.join("\n"));
    classify_into_set(&text)
}
