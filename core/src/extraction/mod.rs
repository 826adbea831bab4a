//! Turns typed user input into a single text blob.

pub mod docx;
pub mod excel;
pub mod ocr;
pub mod pdf;
pub mod web;

use crate::config::DraftConfig;
use crate::error::{CoreError, CoreResult};
use self::ocr::{OcrEngine, TesseractOcr};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Image,
    Pdf,
    Docx,
    Excel,
    Web,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Image => "image",
            InputKind::Pdf => "pdf",
            InputKind::Docx => "docx",
            InputKind::Excel => "excel",
            InputKind::Web => "web",
        }
    }
}

impl FromStr for InputKind {
    type Err = CoreError;

    /// Accepts the short names plus the labels the input picker shows
    /// ("Word", "Web Page", ...), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(InputKind::Text),
            "image" => Ok(InputKind::Image),
            "pdf" => Ok(InputKind::Pdf),
            "docx" | "word" => Ok(InputKind::Docx),
            "excel" | "xlsx" => Ok(InputKind::Excel),
            "web" | "web page" | "url" => Ok(InputKind::Web),
            other => Err(CoreError::InvalidInput(format!(
                "unsupported input kind: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPayload {
    Text(String),
    Bytes(Vec<u8>),
    Url(String),
}

impl InputPayload {
    /// Interprets a command-line style argument for `kind`: literal text,
    /// a URL, or a path whose bytes are read.
    pub fn for_kind(kind: InputKind, arg: &str) -> CoreResult<Self> {
        match kind {
            InputKind::Text => Ok(InputPayload::Text(arg.to_string())),
            InputKind::Web => Ok(InputPayload::Url(arg.to_string())),
            _ => Ok(InputPayload::Bytes(fs::read(Path::new(arg))?)),
        }
    }
}

pub struct Extractor {
    ocr: Box<dyn OcrEngine>,
    http: reqwest::blocking::Client,
}

impl Extractor {
    pub fn new(ocr: Box<dyn OcrEngine>) -> CoreResult<Self> {
        // Web fetches block with no timeout of their own.
        let http = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()?;
        Ok(Self { ocr, http })
    }

    pub fn from_config(cfg: &DraftConfig) -> CoreResult<Self> {
        Self::new(Box::new(TesseractOcr::new(
            &cfg.tesseract_cmd,
            &cfg.ocr_language,
        )))
    }

    pub fn extract(&self, payload: &InputPayload, kind: InputKind) -> CoreResult<String> {
        debug!(kind = kind.as_str(), "extracting input");
        let text = match (kind, payload) {
            (InputKind::Text, InputPayload::Text(t)) => t.clone(),
            (InputKind::Image, InputPayload::Bytes(b)) => ocr::extract_image_text(b, self.ocr.as_ref())?,
            (InputKind::Pdf, InputPayload::Bytes(b)) => pdf::extract_pdf_text(b)?,
            (InputKind::Docx, InputPayload::Bytes(b)) => docx::extract_docx_text(b)?,
            (InputKind::Excel, InputPayload::Bytes(b)) => excel::extract_excel_text(b)?,
            (InputKind::Web, InputPayload::Url(u)) => web::fetch_visible_text(&self.http, u)?,
            (kind, _) => {
                return Err(CoreError::InvalidInput(format!(
                    "payload does not match input kind {}",
                    kind.as_str()
                )))
            }
        };
        info!(kind = kind.as_str(), chars = text.len(), "input extracted");
        Ok(text)
    }
}
