//! Pipeline orchestration for quiz question generation.
//!
//! # Pipeline Flow
//!
//! 1. **Prompt**: build the constrained instruction for a theme and count
//! 2. **Completion**: one request to the chat-completion endpoint
//! 3. **Extraction**: strip a code fence wrapped around the JSON reply
//! 4. **Validation**: enforce the question schema, repair mismatched answers
//! 5. **Raw output**: always persist the validated set
//! 6. **Enrichment**: optional external transform, falling back to the raw set
//! 7. **Merge**: optionally append the final set to a question bank
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quizforge::llm::ChatCompletionClient;
//! use quizforge::pipeline::{QuizConfig, QuizPipeline, QuizRequest};
//!
//! let client = ChatCompletionClient::from_env()?;
//! let pipeline = QuizPipeline::new(Arc::new(client), QuizConfig::new());
//!
//! let request = QuizRequest::new("astronomie", 3, "./tools").with_enrichment(false);
//! let summary = pipeline.run(&request).await?;
//! println!("{} questions written to {}", summary.generated, summary.final_path.display());
//! ```

pub mod config;
pub mod orchestrator;

pub use config::{
    ConfigError, QuizConfig, DEFAULT_MAX_TOKENS, DEFAULT_QUESTION_COUNT, DEFAULT_TEMPERATURE,
};
pub use orchestrator::{
    EnrichmentOutcome, PipelineError, QuizPipeline, QuizRequest, RunSummary,
};
