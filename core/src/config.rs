use crate::error::CoreResult;
use crate::requirements::model::Dialect;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    pub model_endpoint: String,
    pub model_id: String,
    pub max_length: usize,
    pub allow_remote_model: bool,
    pub rules_path: PathBuf,
    pub inventory_path: PathBuf,
    pub export_root: PathBuf,
    pub dialect: Dialect,
    pub tesseract_cmd: String,
    pub ocr_language: String,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            model_endpoint: "http://127.0.0.1:8080".to_string(),
            model_id: "gpt2".to_string(),
            max_length: 500,
            allow_remote_model: false,
            rules_path: PathBuf::from("finance_rules.csv"),
            inventory_path: PathBuf::from("inventory.json"),
            export_root: PathBuf::from("requirements"),
            dialect: Dialect::American,
            tesseract_cmd: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
        }
    }
}

impl DraftConfig {
    /// Loads a JSON config file. A missing file yields the defaults; a file
    /// that exists but does not parse is an error.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file absent, using defaults");
            return Ok(Self::default());
        }
        let bytes = fs::read(path)?;
        let cfg: DraftConfig = serde_json::from_slice(&bytes)?;
        Ok(cfg)
    }
}
