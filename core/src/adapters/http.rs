//! Blocking client for a text-generation-inference style `/generate` endpoint.

use crate::adapters::interface::{
    classify_adapter_error, enforce_loopback_endpoint, GenerationRequest, TextGenerator,
};
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Serialize)]
struct GenerateBody<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Serialize)]
struct GenerateParameters {
    max_new_tokens: usize,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    generated_text: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

pub struct HttpTextGenerator {
    client: reqwest::blocking::Client,
    endpoint: String,
    model_id: String,
}

impl HttpTextGenerator {
    /// `endpoint` is the server base URL (no trailing slash needed). Unless
    /// `allow_remote` is set the host must be a loopback address.
    ///
    /// No request timeout is configured: generation blocks until the server
    /// answers.
    pub fn new(endpoint: &str, model_id: &str, allow_remote: bool) -> CoreResult<Self> {
        if allow_remote {
            url::Url::parse(endpoint)
                .map_err(|_| CoreError::InvalidInput("invalid model endpoint URL".to_string()))?;
        } else {
            enforce_loopback_endpoint(endpoint)?;
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| CoreError::Generation(format!("failed to build model client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model_id: model_id.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TextGenerator for HttpTextGenerator {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn generate(&self, req: &GenerationRequest) -> CoreResult<String> {
        let url = format!("{}/generate", self.endpoint);
        let body = GenerateBody {
            inputs: &req.prompt,
            parameters: GenerateParameters {
                max_new_tokens: req.max_length,
                return_full_text: true,
            },
        };

        info!(url = %url, model = %self.model_id, max_length = req.max_length, "requesting completion");
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| CoreError::Generation(format!("model call failed: {}", e)))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            let classified = classify_adapter_error(&message);
            return Err(CoreError::Generation(format!(
                "model server returned {} ({:?}, retryable={}): {}",
                status.as_u16(),
                classified.category,
                classified.retryable,
                classified.message
            )));
        }

        let text = resp
            .text()
            .map_err(|e| CoreError::Generation(format!("failed to read completion: {}", e)))?;
        // Servers answer either a single object or a one-element array.
        let completion = match serde_json::from_str::<GenerateResponse>(&text) {
            Ok(r) => r.generated_text,
            Err(_) => serde_json::from_str::<Vec<GenerateResponse>>(&text)
                .map_err(|e| CoreError::Generation(format!("malformed completion: {}", e)))?
                .into_iter()
                .next()
                .map(|r| r.generated_text)
                .ok_or_else(|| CoreError::Generation("model returned no completion".to_string()))?,
        };
        debug!(chars = completion.len(), "completion received");
        Ok(completion)
    }
}
