//! Generation provider plumbing.

use anyhow::{Context, Result};

use crate::hunt::GenerateError;

pub mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};

/// Standard User-Agent header for Vocabify API requests.
pub const USER_AGENT: &str = concat!("vocabify/", env!("CARGO_PKG_VERSION"));

/// Resolves an API key with precedence: config > env.
///
/// # Arguments
/// * `config_api_key` - Value from config file (if present)
/// * `env_var` - Environment variable name (e.g., "`GEMINI_API_KEY`")
/// * `config_section` - Config section name (e.g., "gemini")
///
/// # Errors
/// Returns an error if no key is available from either source.
pub fn resolve_api_key(
    config_api_key: Option<&str>,
    env_var: &str,
    config_section: &str,
) -> Result<String> {
    // Try config value first
    if let Some(key) = config_api_key {
        let trimmed = key.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    // Fall back to env var
    std::env::var(env_var).context(format!(
        "No API key available. Set {env_var} or api_key in [providers.{config_section}]."
    ))
}

/// Resolves a base URL with precedence: env > config > default.
///
/// # Errors
/// Returns an error if a provided URL is not well-formed.
pub fn resolve_base_url(
    config_base_url: Option<&str>,
    env_var: &str,
    default_url: &str,
    provider_name: &str,
) -> Result<String> {
    if let Ok(env_url) = std::env::var(env_var) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed, provider_name)?;
            return Ok(trimmed.to_string());
        }
    }

    if let Some(config_url) = config_base_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed, provider_name)?;
            return Ok(trimmed.to_string());
        }
    }

    Ok(default_url.to_string())
}

fn validate_url(url: &str, provider_name: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid {provider_name} base URL: {url}"))?;
    Ok(())
}

/// Classifies a reqwest error into a categorized [`GenerateError`].
pub fn classify_reqwest_error(e: &reqwest::Error) -> GenerateError {
    if e.is_timeout() {
        GenerateError::transport(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        GenerateError::transport(format!("Connection failed: {e}"))
    } else if e.is_request() {
        GenerateError::transport(format!("Request error: {e}"))
    } else {
        GenerateError::transport(format!("Network error: {e}"))
    }
}
