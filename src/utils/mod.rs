//! Shared utility functions for quizforge.
//!
//! Currently holds the helpers that pull a JSON payload out of a model reply.

pub mod json_extraction;

pub use json_extraction::{extract_json_payload, is_fenced, preview, FENCE};
