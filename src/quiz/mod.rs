//! Quiz domain types.
//!
//! A [`QuestionSet`] is produced once per run from a single model response,
//! repaired in place by the validator, and persisted by the export module.

pub mod types;

pub use types::{Question, QuestionSet, OPTION_COUNT};
