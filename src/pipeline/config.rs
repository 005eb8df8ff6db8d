//! Generation settings for the quiz pipeline.
//!
//! Covers the completion endpoint, model, and token budget. The sampling
//! temperature and the request timeout (see [`crate::llm::REQUEST_TIMEOUT`])
//! are fixed and not read from the environment.

use thiserror::Error;

use crate::llm::{DEFAULT_API_BASE, DEFAULT_MODEL};

/// Default response-size budget for one completion.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Sampling temperature sent with every request; favors varied answers.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default number of questions requested per run.
pub const DEFAULT_QUESTION_COUNT: i64 = 10;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration for question generation.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Maximum number of tokens the model may generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl QuizConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QUIZFORGE_API_BASE`: API base URL (default: Groq)
    /// - `QUIZFORGE_MODEL`: model identifier (default: llama-3.3-70b-versatile)
    /// - `QUIZFORGE_MAX_TOKENS`: response token budget (default: 4096)
    ///
    /// The temperature always starts at [`DEFAULT_TEMPERATURE`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or the result is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("QUIZFORGE_API_BASE") {
            config.api_base = val;
        }

        if let Ok(val) = std::env::var("QUIZFORGE_MODEL") {
            config.model = val;
        }

        if let Ok(val) = std::env::var("QUIZFORGE_MAX_TOKENS") {
            config.max_tokens = parse_env_value(&val, "QUIZFORGE_MAX_TOKENS")?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "api_base cannot be empty".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "model cannot be empty".to_string(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder method to set the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Builder method to set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder method to set the token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Builder method to set temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Parses an environment variable value into the specified type.
fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
}
