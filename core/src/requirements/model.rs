use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String")]
pub enum Dialect {
    #[default]
    American,
    British,
}

impl Dialect {
    /// "British" (any case) selects British spelling; every other label is
    /// treated as American.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("british") {
            Dialect::British
        } else {
            Dialect::American
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::American => "American",
            Dialect::British => "British",
        }
    }
}

impl From<String> for Dialect {
    fn from(label: String) -> Self {
        Dialect::from_label(&label)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequirementSet {
    pub functional: Vec<String>,
    pub non_functional: Vec<String>,
    pub raw_text: String,
}

impl RequirementSet {
    pub fn len(&self) -> usize {
        self.functional.len() + self.non_functional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClarityBand {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClarityScore {
    pub score: u8,
    pub comment: String,
}

impl ClarityScore {
    pub fn band(&self) -> ClarityBand {
        match self.score {
            0..=3 => ClarityBand::Low,
            4..=7 => ClarityBand::Medium,
            _ => ClarityBand::High,
        }
    }
}
