//! LLM prompts for quiz question generation.
//!
//! ```
//! use quizforge::prompts::build_questions_prompt;
//!
//! let prompt = build_questions_prompt("géographie", 5);
//! assert!(prompt.contains("géographie"));
//! ```

pub mod questions;

pub use questions::build_questions_prompt;
