//! Export module for generated question sets.
//!
//! Provides file naming, JSON persistence, and merging into an existing
//! question bank.

pub mod bank;
pub mod writer;

pub use bank::{merge_into_bank, MergeStats};
pub use writer::{
    read_questions, theme_slug, to_pretty_json, write_questions, OutputPaths, SLUG_MAX_CHARS,
};
