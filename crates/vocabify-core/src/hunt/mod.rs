//! Error Hunt domain: generation request/result contract and errors.
//!
//! The gateway contract is `providers::gemini::GeminiClient::generate_passage`,
//! which takes a validated [`GenerationRequest`] and returns a
//! [`GenerationResult`] or a categorized [`GenerateError`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod prompt;
pub mod selection;
pub mod session;

/// Minimum passage length in words.
pub const MIN_PASSAGE_LENGTH: u32 = 50;
/// Maximum passage length in words.
pub const MAX_PASSAGE_LENGTH: u32 = 500;
/// Minimum topic length in characters, after trimming.
pub const MIN_TOPIC_CHARS: usize = 2;

/// Placeholder weakness categories used until per-user profiles exist.
pub const PLACEHOLDER_WEAKNESSES: &[&str] = &[
    "Subject-verb agreement",
    "Comma splices",
    "Misplaced modifiers",
];

/// Difficulty level for a generated passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Returns the lowercase identifier used in prompts and config.
    pub fn id(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "Invalid difficulty '{other}'. Valid options: easy, medium, hard"
            )),
        }
    }
}

/// A learner's weakness categories, supplied by the profile collaborator.
///
/// The default is the fixed placeholder set; callers with real profile data
/// inject their own list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaknessProfile {
    pub weaknesses: Vec<String>,
}

impl Default for WeaknessProfile {
    fn default() -> Self {
        Self {
            weaknesses: PLACEHOLDER_WEAKNESSES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Parameters for one passage generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    /// Target length in words, within [`MIN_PASSAGE_LENGTH`]..=[`MAX_PASSAGE_LENGTH`].
    pub passage_length: u32,
    /// Ordered weakness categories steering the injected errors.
    pub weaknesses: Vec<String>,
}

impl GenerationRequest {
    /// Validates the request, reporting one issue per violated field.
    ///
    /// # Errors
    /// Returns `GenerateError::Validation` if any field is out of range.
    pub fn validate(&self) -> Result<(), GenerateError> {
        let mut issues = Vec::new();

        if self.topic.trim().chars().count() < MIN_TOPIC_CHARS {
            issues.push(FieldIssue {
                field: "topic",
                message: "Topic must be at least 2 characters.".to_string(),
            });
        }

        if self.passage_length < MIN_PASSAGE_LENGTH || self.passage_length > MAX_PASSAGE_LENGTH {
            issues.push(FieldIssue {
                field: "passage_length",
                message: format!(
                    "Passage length must be between {MIN_PASSAGE_LENGTH} and {MAX_PASSAGE_LENGTH} words."
                ),
            });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(GenerateError::Validation { issues })
        }
    }
}

/// A successfully generated passage with error-category hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Prose containing deliberately embedded errors. Non-empty on success.
    pub passage: String,
    /// Category labels describing (not locating) the injected errors.
    /// May be empty, but the field itself is required.
    pub suggested_errors: Vec<String>,
}

/// A single violated field in a [`GenerationRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Categorized failure from the passage generation gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// Bad input; no network call was made.
    Validation { issues: Vec<FieldIssue> },
    /// Non-2xx HTTP status or transport failure from the provider.
    Provider {
        status: Option<u16>,
        message: String,
        /// Raw error body, kept for diagnostics only.
        details: Option<String>,
    },
    /// Response text was not parseable as the expected structure.
    MalformedResponse { message: String },
    /// Well-formed response carrying no usable passage.
    EmptyResponse,
}

impl GenerateError {
    /// Creates a provider error from a non-2xx HTTP response.
    ///
    /// Tries to extract the provider's `error.message` from the JSON body
    /// for a cleaner one-line summary; the raw body is kept as details.
    pub fn http_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .as_ref()
            .and_then(|json| json.get("error"))
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
            .map_or_else(
                || format!("HTTP {status}"),
                |msg| format!("HTTP {status}: {msg}"),
            );
        Self::Provider {
            status: Some(status),
            message,
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Creates a provider error from a transport-level failure.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Provider {
            status: None,
            message: message.into(),
            details: None,
        }
    }

    /// Creates a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Returns the single human-readable message shown to the user.
    ///
    /// Provider errors are normalized into recognizable categories
    /// (invalid credential, missing credential / failed precondition,
    /// rate limited); unrecognized errors pass through their raw message.
    /// Raw provider payloads are never included here.
    pub fn user_message(&self) -> String {
        match self {
            GenerateError::Validation { issues } => {
                let joined = issues
                    .iter()
                    .map(|issue| issue.message.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("Invalid form data. {joined}")
            }
            GenerateError::Provider {
                status, message, ..
            } => {
                if message.contains("API key not valid") || message.contains("API_KEY_INVALID") {
                    "The provided Gemini API key is not valid. Check api_key in \
                     [providers.gemini] or the GEMINI_API_KEY environment variable."
                        .to_string()
                } else if message.contains("GEMINI_API_KEY")
                    || message.contains("FAILED_PRECONDITION")
                {
                    "The Gemini API key is missing. Set GEMINI_API_KEY or api_key in \
                     [providers.gemini]."
                        .to_string()
                } else if *status == Some(429) || message.contains("RESOURCE_EXHAUSTED") {
                    "The Gemini API is rate limiting requests. Try again in a moment.".to_string()
                } else {
                    message.clone()
                }
            }
            GenerateError::MalformedResponse { .. } => {
                "The model did not return the expected passage structure.".to_string()
            }
            GenerateError::EmptyResponse => {
                "The model returned an empty response. This could be due to a \
                 configuration issue or content safety filters."
                    .to_string()
            }
        }
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Validation { issues } => {
                write!(f, "invalid request")?;
                for issue in issues {
                    write!(f, "; {issue}")?;
                }
                Ok(())
            }
            GenerateError::Provider { message, .. } => write!(f, "{message}"),
            GenerateError::MalformedResponse { message } => {
                write!(f, "malformed response: {message}")
            }
            GenerateError::EmptyResponse => write!(f, "empty response"),
        }
    }
}

impl std::error::Error for GenerateError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(topic: &str, passage_length: u32) -> GenerationRequest {
        GenerationRequest {
            topic: topic.to_string(),
            difficulty: Difficulty::Medium,
            passage_length,
            weaknesses: WeaknessProfile::default().weaknesses,
        }
    }

    #[test]
    fn validate_accepts_boundary_lengths() {
        assert!(request("space exploration", 50).validate().is_ok());
        assert!(request("space exploration", 500).validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_lengths() {
        for length in [49, 501] {
            let err = request("space exploration", length).validate().unwrap_err();
            let GenerateError::Validation { issues } = err else {
                panic!("expected validation error");
            };
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].field, "passage_length");
        }
    }

    #[test]
    fn validate_rejects_short_topic() {
        let err = request("a", 150).validate().unwrap_err();
        let GenerateError::Validation { issues } = err else {
            panic!("expected validation error");
        };
        assert_eq!(issues[0].field, "topic");
        assert_eq!(issues[0].message, "Topic must be at least 2 characters.");
    }

    #[test]
    fn validate_accepts_two_char_topic() {
        assert!(request("ab", 150).validate().is_ok());
    }

    #[test]
    fn validate_trims_topic_before_measuring() {
        assert!(request("  a  ", 150).validate().is_err());
    }

    #[test]
    fn validate_reports_one_issue_per_field() {
        let err = request("x", 10).validate().unwrap_err();
        let GenerateError::Validation { issues } = err else {
            panic!("expected validation error");
        };
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("Easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn result_deserializes_wire_format() {
        let result: GenerationResult = serde_json::from_str(
            r#"{"passage": "The cat run fast.", "suggestedErrors": ["Subject-verb agreement"]}"#,
        )
        .unwrap();
        assert_eq!(result.passage, "The cat run fast.");
        assert_eq!(result.suggested_errors, vec!["Subject-verb agreement"]);
    }

    #[test]
    fn result_requires_both_fields() {
        // Missing suggestedErrors is a typed parse failure, not a silent default.
        assert!(serde_json::from_str::<GenerationResult>(r#"{"passage": "x"}"#).is_err());
        assert!(serde_json::from_str::<GenerationResult>(r#"{"suggestedErrors": []}"#).is_err());
    }

    #[test]
    fn http_status_extracts_provider_message() {
        let err = GenerateError::http_status(401, r#"{"error":{"message":"API key not valid"}}"#);
        let GenerateError::Provider {
            status, message, ..
        } = &err
        else {
            panic!("expected provider error");
        };
        assert_eq!(*status, Some(401));
        assert_eq!(message, "HTTP 401: API key not valid");
    }

    #[test]
    fn user_message_categorizes_invalid_credential() {
        let err = GenerateError::http_status(401, r#"{"error":{"message":"API key not valid"}}"#);
        assert!(err.user_message().contains("not valid"));
        assert!(!err.user_message().contains("HTTP 401"));
    }

    #[test]
    fn user_message_categorizes_missing_credential() {
        let err = GenerateError::transport(
            "No API key available. Set GEMINI_API_KEY or api_key in [providers.gemini].",
        );
        assert!(err.user_message().contains("missing"));
    }

    #[test]
    fn user_message_categorizes_rate_limit() {
        let err = GenerateError::http_status(429, r#"{"error":{"message":"quota exceeded"}}"#);
        assert!(err.user_message().contains("rate limiting"));

        let err = GenerateError::http_status(
            400,
            r#"{"error":{"message":"RESOURCE_EXHAUSTED: slow down"}}"#,
        );
        assert!(err.user_message().contains("rate limiting"));
    }

    #[test]
    fn user_message_passes_through_unrecognized_errors() {
        let err = GenerateError::http_status(500, r#"{"error":{"message":"internal wobble"}}"#);
        assert_eq!(err.user_message(), "HTTP 500: internal wobble");
    }
}
