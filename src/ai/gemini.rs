//! Gemini `generateContent` backend with JSON-schema constrained output.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AiBackend;
use crate::api::ApiError;
use crate::config::AiConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl ErrorBody {
    fn is_quota(&self) -> bool {
        self.code == 429 || self.status == "RESOURCE_EXHAUSTED"
    }

    fn into_api_error(self, http_status: StatusCode) -> ApiError {
        if self.is_quota() {
            return ApiError::RateLimited(self.message);
        }
        let status = StatusCode::from_u16(self.code)
            .ok()
            .filter(|s| s.is_client_error() || s.is_server_error())
            .unwrap_or(http_status);
        api_error(status, self.message)
    }
}

/// A rejected API key is a configuration problem, not an expired login
fn api_error(status: StatusCode, message: String) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ApiError::Config(format!("Gemini rejected the API key: {}", message))
        }
        _ => ApiError::from_status(status, message),
    }
}

pub struct GeminiBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    /// Build from config, taking the key from `GEMINI_API_KEY` or the config file
    pub fn new(config: &AiConfig) -> Result<Self, ApiError> {
        let api_key = config.resolved_api_key().ok_or_else(|| {
            ApiError::Config(
                "No Gemini API key. Set GEMINI_API_KEY or `fit-tracker config set ai.api_key`"
                    .to_string(),
            )
        })?;
        Self::with_key(config, api_key)
    }

    pub fn with_key(config: &AiConfig, api_key: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn map_error(status: StatusCode, body: &str) -> ApiError {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope.error.into_api_error(status),
            Err(_) => api_error(status, body.trim().to_string()),
        }
    }

    fn extract_json(response: GenerateResponse) -> Result<Value, ApiError> {
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ApiError::ValidationFailure("No content in Gemini response".to_string()))?;

        serde_json::from_str(strip_code_fence(&text)).map_err(|e| {
            ApiError::ValidationFailure(format!("Gemini returned non-JSON text: {}", e))
        })
    }
}

/// Drop a surrounding ```json fence if the model added one
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

#[async_trait]
impl AiBackend for GeminiBackend {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<Value, ApiError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        tracing::debug!(model = %self.model, "Sending Gemini generateContent request");

        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = %status, "Gemini API error");
            return Err(Self::map_error(status, &text));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
            ApiError::ValidationFailure(format!("Unreadable Gemini response: {}", e))
        })?;

        if let Some(error) = parsed.error {
            return Err(error.into_api_error(status));
        }

        Self::extract_json(parsed)
    }
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
