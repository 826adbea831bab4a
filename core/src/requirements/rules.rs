use crate::error::{CoreError, CoreResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const RULE_COLUMN: &str = "Rule";

const BUILTIN_FINANCE_RULES: [&str; 6] = [
    "The system must encrypt all cardholder data at rest and in transit.",
    "The system must keep an immutable audit trail of every transaction.",
    "The system shall support anti-money-laundering screening for new accounts.",
    "Transaction processing must complete under 3 seconds at peak load.",
    "Customer data retention must meet regulatory compliance requirements.",
    "The system shall reconcile ledger balances daily.",
];

/// Finance domain rules appended to every generated draft. Loaded once and
/// read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainRules {
    rules: Vec<String>,
}

impl DomainRules {
    pub fn new(rules: Vec<String>) -> Self {
        Self { rules }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_FINANCE_RULES.iter().map(|r| r.to_string()).collect())
    }

    pub fn load_csv(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let rules = Self::from_csv_reader(File::open(path)?)?;
        tracing::info!(path = %path.display(), count = rules.len(), "loaded domain rules");
        Ok(rules)
    }

    /// Falls back to the builtin set when `path` does not exist. Any other
    /// failure is returned.
    pub fn load_csv_or_builtin(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "rules file absent, using builtin finance rules");
            return Ok(Self::builtin());
        }
        Self::load_csv(path)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> CoreResult<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let idx = rdr
            .headers()?
            .iter()
            .position(|h| h.trim() == RULE_COLUMN)
            .ok_or_else(|| {
                CoreError::InvalidInput(format!("rules table has no '{}' column", RULE_COLUMN))
            })?;
        let mut rules = Vec::new();
        for rec in rdr.records() {
            let rec = rec?;
            if let Some(rule) = rec.get(idx) {
                let rule = rule.trim();
                if !rule.is_empty() {
                    rules.push(rule.to_string());
                }
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// One rule per line.
    pub fn joined(&self) -> String {
        self.rules.join("\n")
    }
}
