//! quizforge: quiz question generation with an LLM.
//!
//! This library builds a constrained prompt for a theme, requests questions
//! from a chat-completion API, extracts and validates the JSON reply, repairs
//! answers that match no option, and persists the result, optionally passing it
//! through an external enrichment step.

pub mod cli;
pub mod enrich;
pub mod error;
pub mod export;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod quiz;
pub mod utils;
pub mod validation;

// Re-export commonly used error types
pub use error::{EnrichmentError, LlmError, OutputError, ValidationError};
