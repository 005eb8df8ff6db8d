//! Command-line interface for quizforge.
//!
//! Parses arguments, resolves the credential and tools directory, and runs the
//! generation pipeline.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, Cli};
