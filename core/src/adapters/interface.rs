use crate::adapters::loopback::is_loopback_endpoint;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_length: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdapterErrorCategory {
    Timeout,
    ModelNotFound,
    InvalidInput,
    RuntimeError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterError {
    pub category: AdapterErrorCategory,
    pub message: String,
    pub retryable: bool,
}

/// A text-generation model. Completions are nondeterministic; callers treat
/// the returned string as opaque.
pub trait TextGenerator {
    fn model_id(&self) -> &str;
    fn generate(&self, req: &GenerationRequest) -> CoreResult<String>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    fn generate(&self, req: &GenerationRequest) -> CoreResult<String> {
        (**self).generate(req)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    fn generate(&self, req: &GenerationRequest) -> CoreResult<String> {
        (**self).generate(req)
    }
}

pub fn enforce_loopback_endpoint(endpoint: &str) -> CoreResult<()> {
    if !is_loopback_endpoint(endpoint)? {
        return Err(CoreError::PolicyBlocked(
            "model endpoint rejected: not loopback (127.0.0.1/::1/localhost)".to_string(),
        ));
    }
    Ok(())
}

pub fn classify_adapter_error(err: &str) -> AdapterError {
    let lower = err.to_lowercase();
    let (category, retryable) = if lower.contains("timeout") || lower.contains("timed out") {
        (AdapterErrorCategory::Timeout, true)
    } else if lower.contains("not found") {
        (AdapterErrorCategory::ModelNotFound, false)
    } else if lower.contains("validation") || lower.contains("invalid") {
        (AdapterErrorCategory::InvalidInput, false)
    } else {
        (AdapterErrorCategory::RuntimeError, false)
    };
    AdapterError {
        category,
        message: err.to_string(),
        retryable,
    }
}
