//! LLM integration for quizforge.
//!
//! Provides the [`LlmProvider`] abstraction and an OpenAI-compatible
//! [`ChatCompletionClient`] used to request question sets.
//!
//! ```ignore
//! use quizforge::llm::{ChatCompletionClient, GenerationRequest, LlmProvider, Message};
//!
//! let client = ChatCompletionClient::from_env()?;
//! let request = GenerationRequest::new("", vec![Message::user("Bonjour")])
//!     .with_max_tokens(4096)
//!     .with_temperature(0.7);
//! let response = client.generate(request).await?;
//! println!("{}", response.completion_text()?);
//! ```

pub mod client;

pub use client::{
    ChatCompletionClient, Choice, GenerationRequest, GenerationResponse, LlmProvider, Message,
    Usage, API_KEY_ENV, DEFAULT_API_BASE, DEFAULT_MODEL, REQUEST_TIMEOUT,
};
