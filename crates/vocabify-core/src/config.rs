//! Configuration management for Vocabify.
//!
//! Loads configuration from ${VOCABIFY_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Gemini provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiProviderConfig {
    /// API key. Falls back to the GEMINI_API_KEY environment variable.
    pub api_key: Option<String>,
    /// Base URL override. GEMINI_BASE_URL takes precedence over this.
    pub base_url: Option<String>,
}

/// Provider configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub gemini: GeminiProviderConfig,
}

/// Learner profile configuration.
///
/// Weaknesses steer passage generation. Until profiles are persisted
/// per-user, an empty list means the built-in placeholder set is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weaknesses: Vec<String>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The Gemini model to use for passage generation.
    pub model: String,

    /// Sampling temperature for generation.
    pub temperature: f32,

    /// Maximum output tokens per generation request.
    pub max_output_tokens: u32,

    /// Provider configuration (API keys, base URLs).
    pub providers: ProvidersConfig,

    /// Learner profile (weakness categories).
    pub profile: ProfileConfig,
}

impl Config {
    const DEFAULT_MODEL: &str = "gemini-2.5-flash";
    const DEFAULT_TEMPERATURE: f32 = 0.7;
    const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 800;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the default config template to the default path.
    ///
    /// Fails if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init() -> Result<std::path::PathBuf> {
        let path = paths::config_path();
        if path.exists() {
            anyhow::bail!("Config already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, default_config_template())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: Self::DEFAULT_MODEL.to_string(),
            temperature: Self::DEFAULT_TEMPERATURE,
            max_output_tokens: Self::DEFAULT_MAX_OUTPUT_TOKENS,
            providers: ProvidersConfig::default(),
            profile: ProfileConfig::default(),
        }
    }
}

/// Default config.toml contents written by `vocabify config init`.
fn default_config_template() -> &'static str {
    r#"# Vocabify configuration

# Gemini model used for passage generation
model = "gemini-2.5-flash"

# Generation parameters
temperature = 0.7
max_output_tokens = 800

[providers.gemini]
# api_key = "..."        # or set GEMINI_API_KEY
# base_url = "https://generativelanguage.googleapis.com/v1beta"

[profile]
# Weakness categories used to steer generated errors.
# weaknesses = ["Subject-verb agreement", "Comma splices"]
"#
}

pub mod paths {
    //! Path resolution for Vocabify configuration directories.
    //!
    //! VOCABIFY_HOME resolution order:
    //! 1. VOCABIFY_HOME environment variable (if set)
    //! 2. ~/.config/vocabify (default)

    use std::path::PathBuf;

    /// Returns the Vocabify home directory.
    ///
    /// Checks VOCABIFY_HOME env var first, falls back to ~/.config/vocabify
    pub fn vocabify_home() -> PathBuf {
        if let Ok(home) = std::env::var("VOCABIFY_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("vocabify"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        vocabify_home().join("config.toml")
    }
}
