//! Merging generated questions into an existing question bank.
//!
//! The quiz game reads a single `questions.json`. Merging appends the new
//! questions to that file, skipping any whose text is already present.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::writer::{read_questions, write_questions};
use crate::error::OutputError;
use crate::quiz::QuestionSet;

/// Outcome of a merge into a question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Questions appended to the bank.
    pub added: usize,
    /// Questions skipped because the bank already had the same text.
    pub skipped: usize,
    /// Size of the bank after the merge.
    pub total: usize,
}

/// Appends `questions` to the bank at `bank_path`.
///
/// A missing bank file is treated as empty and created. Questions are compared
/// by exact text; duplicates inside `questions` itself are also skipped. The
/// bank is replaced atomically, so a failed merge leaves it as it was.
///
/// # Errors
///
/// Returns `OutputError` if an existing bank cannot be read or parsed, or if
/// the merged bank cannot be written.
pub fn merge_into_bank(bank_path: &Path, questions: &QuestionSet) -> Result<MergeStats, OutputError> {
    let mut bank = if bank_path.exists() {
        read_questions(bank_path)?
    } else {
        QuestionSet::default()
    };

    let mut added = 0;
    let mut skipped = 0;

    for question in questions {
        if bank.contains_text(&question.question) {
            skipped += 1;
        } else {
            bank.push(question.clone());
            added += 1;
        }
    }

    write_questions(bank_path, &bank)?;

    let stats = MergeStats {
        added,
        skipped,
        total: bank.len(),
    };
    info!(
        bank = %bank_path.display(),
        added = stats.added,
        skipped = stats.skipped,
        total = stats.total,
        "Merged questions into bank"
    );

    Ok(stats)
}
