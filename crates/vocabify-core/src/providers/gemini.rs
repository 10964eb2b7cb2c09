//! Gemini passage generation gateway (Google Generative Language API).
//!
//! One non-streaming `generateContent` round-trip per invocation, no
//! retries. Structured output is requested through a forced
//! `outputPassage` function call; free-text JSON brace extraction is the
//! documented fallback only.

use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::config::Config;
use crate::hunt::prompt::build_prompt;
use crate::hunt::{GenerateError, GenerationRequest, GenerationResult};
use crate::providers::{classify_reqwest_error, resolve_api_key, resolve_base_url};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Name of the forced function declaration for structured output.
const OUTPUT_FUNCTION: &str = "outputPassage";

/// Gemini API configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GeminiConfig {
    /// Creates a new config from the app config and environment.
    ///
    /// Authentication resolution order:
    /// 1. `api_key` in `[providers.gemini]`
    /// 2. `GEMINI_API_KEY` environment variable
    ///
    /// Base URL resolution order: `GEMINI_BASE_URL` env var, then
    /// `[providers.gemini].base_url`, then the public endpoint.
    ///
    /// # Errors
    /// Returns an error if no API key is available or a base URL is invalid.
    pub fn from_env(config: &Config, model_override: Option<&str>) -> Result<Self> {
        let gemini = &config.providers.gemini;
        let api_key = resolve_api_key(gemini.api_key.as_deref(), "GEMINI_API_KEY", "gemini")?;
        let base_url = resolve_base_url(
            gemini.base_url.as_deref(),
            "GEMINI_BASE_URL",
            DEFAULT_BASE_URL,
            "Gemini",
        )?;

        Ok(Self {
            api_key,
            base_url,
            model: model_override.unwrap_or(&config.model).to_string(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }
}

/// Gemini client: the passage generation gateway.
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Generates a passage with embedded errors for the given request.
    ///
    /// Validates input before any network call, makes a single
    /// `generateContent` round-trip, and extracts the structured result.
    ///
    /// # Errors
    /// Returns a categorized [`GenerateError`] on invalid input, provider
    /// failure, malformed response, or empty result.
    pub async fn generate_passage(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerateError> {
        request.validate()?;

        let prompt = build_prompt(request).map_err(|e| GenerateError::Provider {
            status: None,
            message: format!("Failed to render prompt: {e:#}"),
            details: None,
        })?;
        let body = build_generation_request(
            &prompt,
            self.config.temperature,
            self.config.max_output_tokens,
        );
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let response = self
            .http
            .post(&url)
            .headers(build_headers(&self.config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), body = %text, "Gemini request failed");
            return Err(GenerateError::http_status(status.as_u16(), &text));
        }

        let value: Value = serde_json::from_str(&text).map_err(|err| {
            tracing::debug!(body = %text, "Gemini response is not JSON");
            GenerateError::malformed(format!("Response is not valid JSON: {err}"))
        })?;

        extract_result(&value)
    }
}

fn build_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-goog-api-key",
        HeaderValue::from_str(api_key).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    headers.insert("accept", HeaderValue::from_static("application/json"));
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    headers.insert(
        "user-agent",
        HeaderValue::from_static(crate::providers::USER_AGENT),
    );
    headers
}

/// Builds the `generateContent` request body.
///
/// The `outputPassage` function declaration plus a forced function-calling
/// mode is the canonical structured-output strategy; the model cannot
/// answer with free text unless function calling is unavailable.
fn build_generation_request(prompt: &str, temperature: f32, max_output_tokens: u32) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": {
            "temperature": temperature,
            "maxOutputTokens": max_output_tokens
        },
        "toolConfig": {
            "functionCallingConfig": {
                "mode": "ANY",
                "allowedFunctionNames": [OUTPUT_FUNCTION]
            }
        },
        "tools": [{
            "functionDeclarations": [{
                "name": OUTPUT_FUNCTION,
                "description": "Outputs the generated passage and suggested errors.",
                "parameters": {
                    "type": "OBJECT",
                    "properties": {
                        "passage": {
                            "type": "STRING",
                            "description": "The generated text passage."
                        },
                        "suggestedErrors": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "A list of the grammatical errors included in the passage."
                        }
                    },
                    "required": ["passage", "suggestedErrors"]
                }
            }]
        }]
    })
}

/// Extracts a [`GenerationResult`] from a `generateContent` response.
///
/// Prefers the first `functionCall.args` among the candidate parts; falls
/// back to locating the first `{` and last `}` in the combined text parts
/// and parsing the substring.
fn extract_result(value: &Value) -> Result<GenerationResult, GenerateError> {
    let Some(parts) = value
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
    else {
        tracing::debug!(response = %value, "Gemini response has no candidate parts");
        return Err(GenerateError::EmptyResponse);
    };

    for part in parts {
        if let Some(call) = part.get("functionCall") {
            let Some(args) = call.get("args") else {
                return Err(GenerateError::malformed(
                    "Function call has no arguments".to_string(),
                ));
            };
            return finish(serde_json::from_value(args.clone()).map_err(|err| {
                tracing::debug!(args = %args, "Function call args do not match schema");
                GenerateError::malformed(format!("Unexpected function call arguments: {err}"))
            })?);
        }
    }

    // Fallback: free text that should contain a JSON object.
    let combined = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("\n");

    if combined.trim().is_empty() {
        return Err(GenerateError::EmptyResponse);
    }

    let (first, last) = match (combined.find('{'), combined.rfind('}')) {
        (Some(first), Some(last)) if first < last => (first, last),
        _ => {
            tracing::debug!(text = %combined, "Gemini returned free text without JSON");
            return Err(GenerateError::malformed(
                "Response text contains no JSON object".to_string(),
            ));
        }
    };

    finish(
        serde_json::from_str(&combined[first..=last]).map_err(|err| {
            tracing::debug!(text = %combined, "Extracted JSON substring does not parse");
            GenerateError::malformed(format!("Extracted JSON does not parse: {err}"))
        })?,
    )
}

fn finish(result: GenerationResult) -> Result<GenerationResult, GenerateError> {
    if result.passage.trim().is_empty() {
        return Err(GenerateError::EmptyResponse);
    }
    Ok(result)
}
