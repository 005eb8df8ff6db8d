//! Validation of generated question sets.
//!
//! Parses the extracted model output, enforces the question schema, and repairs
//! answers that do not match any option.

pub mod question_validator;

pub use question_validator::{AnswerRepair, QuestionValidator, ValidationReport, PREVIEW_CHARS};
