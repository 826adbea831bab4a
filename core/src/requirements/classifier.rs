use super::model::RequirementSet;

const FUNCTIONAL_MARKERS: [&str; 2] = ["must", "shall"];
const NON_FUNCTIONAL_KEYWORDS: [&str; 6] = [
    "performance",
    "security",
    "load",
    "under",
    "seconds",
    "compliance",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementKind {
    Functional,
    NonFunctional,
}

/// Splits on any run of `.`, `!` or `?`, trims, and drops empty pieces.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(|c| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Rule order decides: a "must"/"shall" sentence is functional even when it
/// also carries a non-functional keyword.
pub fn classify_sentence(sentence: &str) -> RequirementKind {
    let lower = sentence.to_lowercase();
    if FUNCTIONAL_MARKERS.iter().any(|m| lower.contains(m)) {
        RequirementKind::Functional
    } else if NON_FUNCTIONAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        RequirementKind::NonFunctional
    } else {
        RequirementKind::Functional
    }
}

pub fn classify(text: &str) -> (Vec<String>, Vec<String>) {
    let mut functional = Vec::new();
    let mut non_functional = Vec::new();
    for sentence in split_sentences(text) {
        match classify_sentence(sentence) {
            RequirementKind::Functional => functional.push(sentence.to_string()),
            RequirementKind::NonFunctional => non_functional.push(sentence.to_string()),
        }
    }
    (functional, non_functional)
}

pub fn classify_into_set(text: &str) -> RequirementSet {
    let (functional, non_functional) = classify(text);
    RequirementSet {
        functional,
        non_functional,
        raw_text: text.to_string(),
    }
}
