use crate::adapters::http::HttpTextGenerator;
use crate::adapters::interface::{GenerationRequest, TextGenerator};
use crate::config::DraftConfig;
use crate::error::{CoreError, CoreResult};
use crate::extraction::{Extractor, InputKind, InputPayload};
use serde::Serialize;
use tracing::info;

use super::classifier::classify_into_set;
use super::dialect::adjust_dialect;
use super::model::{Dialect, RequirementSet};
use super::refinement::{apply_refinement, detect_triggers, Answer, RefinementRule};
use super::rules::DomainRules;

pub fn build_prompt(extracted: &str) -> String {
    format!(
        "Generate detailed software requirements for: {}. Focus on finance applications. Provide at least 20 requirements.",
        extracted
    )
}

/// Completion followed by the domain rules, one per line.
pub fn merge_with_rules(completion: &str, rules: &DomainRules) -> String {
    format!("{}\n{}", completion, rules.joined())
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub requirements: RequirementSet,
    pub extracted_text: String,
    pub kind: InputKind,
}

impl GenerationOutcome {
    /// For typed ideas the user's own words are scanned; for documents the
    /// generated text is.
    pub fn refinement_questions(&self) -> Vec<&'static RefinementRule> {
        match self.kind {
            InputKind::Text => detect_triggers(&self.extracted_text),
            _ => detect_triggers(&self.requirements.raw_text),
        }
    }

    /// Applies answers to the questions this outcome raised.
    pub fn refine(&self, answers: &[(String, Answer)]) -> RequirementSet {
        apply_refinement(&self.requirements, &self.refinement_questions(), answers)
    }
}

pub struct RequirementGenerator<G: TextGenerator> {
    generator: G,
    rules: DomainRules,
    extractor: Extractor,
    max_length: usize,
}

impl<G: TextGenerator> RequirementGenerator<G> {
    pub fn new(generator: G, rules: DomainRules, extractor: Extractor, max_length: usize) -> Self {
        Self {
            generator,
            rules,
            extractor,
            max_length,
        }
    }

    pub fn rules(&self) -> &DomainRules {
        &self.rules
    }

    pub fn generate(
        &self,
        payload: &InputPayload,
        kind: InputKind,
        dialect: Dialect,
    ) -> CoreResult<GenerationOutcome> {
        let extracted = self.extractor.extract(payload, kind)?;
        let req = GenerationRequest {
            prompt: build_prompt(&extracted),
            max_length: self.max_length,
        };
        let completion = self.generator.generate(&req)?;
        if completion.trim().is_empty() {
            return Err(CoreError::Generation(format!(
                "model {} returned an empty completion",
                self.generator.model_id()
            )));
        }

        let merged = merge_with_rules(&completion, &self.rules);
        let adjusted = adjust_dialect(&merged, dialect);
        let requirements = classify_into_set(&adjusted);
        info!(
            model = self.generator.model_id(),
            dialect = dialect.as_str(),
            functional = requirements.functional.len(),
            non_functional = requirements.non_functional.len(),
            "requirements drafted"
        );
        Ok(GenerationOutcome {
            requirements,
            extracted_text: extracted,
            kind,
        })
    }
}

impl RequirementGenerator<HttpTextGenerator> {
    /// Wires the HTTP model client, rule table and extractor from config.
    pub fn from_config(cfg: &DraftConfig) -> CoreResult<Self> {
        let generator =
            HttpTextGenerator::new(&cfg.model_endpoint, &cfg.model_id, cfg.allow_remote_model)?;
        let rules = DomainRules::load_csv_or_builtin(&cfg.rules_path)?;
        let extractor = Extractor::from_config(cfg)?;
        Ok(Self::new(generator, rules, extractor, cfg.max_length))
    }
}
