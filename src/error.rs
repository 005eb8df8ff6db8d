//! Error types for quizforge operations.
//!
//! Defines error types for each stage of the generation pipeline:
//! - LLM API interactions
//! - Question validation
//! - Output persistence
//! - Enrichment delegation

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error(
        "Missing API key: GROQ_API_KEY environment variable not set.\n\n\
         To get a free API key:\n  \
         1. Go to https://console.groq.com\n  \
         2. Create a free account\n  \
         3. Generate an API key\n  \
         4. Set the variable: export GROQ_API_KEY=gsk_..."
    )]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },

    #[error("Empty completion returned by the model")]
    EmptyCompletion,
}

/// Errors that can occur while validating the model's question payload.
///
/// Every variant is fatal for the run. Answer mismatches are not errors; they
/// are repaired in place and reported through the validation report.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("JSON parsing error: {message}\nRaw response:\n{preview}...")]
    InvalidJson { message: String, preview: String },

    #[error("The response is not a JSON array")]
    NotAnArray,

    #[error("Question {index} is malformed: {reason}")]
    MalformedQuestion { index: usize, reason: String },

    #[error("Question {index} does not have 4 options (found {count})")]
    WrongOptionCount { index: usize, count: usize },
}

/// Errors that can occur while writing question files.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Question bank '{path}' is not a valid question array: {message}")]
    InvalidBank { path: PathBuf, message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by an enrichment delegate.
///
/// These never abort a run: the pipeline logs them and falls back to the
/// unenriched question set.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Enrichment script not found at {0}")]
    ScriptNotFound(PathBuf),

    #[error("Enrichment runtime '{runtime}' is not installed or not in PATH: {message}")]
    RuntimeUnavailable { runtime: String, message: String },

    #[error("Enrichment exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
