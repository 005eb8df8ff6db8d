//! Validation and repair of model-generated question arrays.
//!
//! The policy is asymmetric:
//! - a structural defect (bad JSON, non-array payload, missing key, wrong option
//!   count) fails the whole batch;
//! - a correct answer that matches none of the options is repaired in place by
//!   substituting the first option, and the repair is reported.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ValidationError;
use crate::quiz::{Question, QuestionSet, OPTION_COUNT};
use crate::utils::json_extraction::preview;

/// Number of characters of the offending text echoed back on a JSON error.
pub const PREVIEW_CHARS: usize = 500;

/// Canonical key of the correct answer.
const ANSWER_KEY: &str = "reponseCorrecte";
/// Accepted alternative spelling of the correct answer key.
const ANSWER_KEY_ALIAS: &str = "correctAnswer";

/// A correct answer that was replaced because it matched no option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRepair {
    /// 1-based position of the question in the batch.
    pub index: usize,
    /// The answer the model produced.
    pub original: String,
    /// The option substituted for it (always the first option).
    pub replacement: String,
}

impl fmt::Display for AnswerRepair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Question {} - answer '{}' is not among the options, replaced with '{}'",
            self.index, self.original, self.replacement
        )
    }
}

/// Outcome of a successful validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// The validated, possibly repaired, questions in their original order.
    pub questions: QuestionSet,
    /// Answer repairs performed, in question order.
    pub repairs: Vec<AnswerRepair>,
    /// Non-blocking observations (e.g. duplicate options).
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Number of questions that passed validation.
    pub fn success_count(&self) -> usize {
        self.questions.len()
    }

    /// Returns true if at least one answer had to be repaired.
    pub fn has_repairs(&self) -> bool {
        !self.repairs.is_empty()
    }
}

/// Validator for question arrays produced by the model.
pub struct QuestionValidator;

impl QuestionValidator {
    /// Parses `content` as JSON and validates it as a question array.
    ///
    /// # Errors
    ///
    /// - `ValidationError::InvalidJson` if `content` is not valid JSON; the error
    ///   carries the first [`PREVIEW_CHARS`] characters of the text.
    /// - Any error from [`QuestionValidator::validate_value`].
    pub fn validate(content: &str) -> Result<ValidationReport, ValidationError> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| ValidationError::InvalidJson {
                message: e.to_string(),
                preview: preview(content, PREVIEW_CHARS),
            })?;

        Self::validate_value(value)
    }

    /// Validates an already-parsed JSON value as a question array.
    ///
    /// Records are checked in order. The first structurally broken record aborts
    /// the whole batch; answer mismatches are repaired and logged.
    ///
    /// # Errors
    ///
    /// - `ValidationError::NotAnArray` if the value is not an array.
    /// - `ValidationError::MalformedQuestion` if a record is not an object, lacks
    ///   a required key, or has fields of the wrong type.
    /// - `ValidationError::WrongOptionCount` if a record does not have exactly
    ///   four options.
    pub fn validate_value(value: Value) -> Result<ValidationReport, ValidationError> {
        let Value::Array(records) = value else {
            return Err(ValidationError::NotAnArray);
        };

        let mut report = ValidationReport::default();

        for (position, record) in records.into_iter().enumerate() {
            let index = position + 1;
            let (mut question, replaced) = parse_record(index, record)?;

            if question.has_duplicate_options() {
                warn!(index, "Question {} has duplicate options", index);
                report
                    .warnings
                    .push(format!("Question {} has duplicate options", index));
            }

            if let Some(repair) = replaced.or_else(|| repair_answer(index, &mut question)) {
                warn!(
                    index,
                    original = %repair.original,
                    replacement = %repair.replacement,
                    "{}",
                    repair
                );
                report.repairs.push(repair);
            }

            report.questions.push(question);
        }

        Ok(report)
    }
}

/// Checks the structure of one record and converts it to a `Question`.
///
/// A non-string answer is replaced with the first option before conversion;
/// the returned repair records it.
fn parse_record(
    index: usize,
    record: Value,
) -> Result<(Question, Option<AnswerRepair>), ValidationError> {
    let Value::Object(mut fields) = record else {
        return Err(malformed(index, "not a JSON object"));
    };

    for key in ["question", "options"] {
        if !fields.contains_key(key) {
            return Err(malformed(index, format!("missing key '{}'", key)));
        }
    }

    let answer_key = match (
        fields.contains_key(ANSWER_KEY),
        fields.contains_key(ANSWER_KEY_ALIAS),
    ) {
        (false, false) => {
            return Err(malformed(index, format!("missing key '{}'", ANSWER_KEY)));
        }
        (true, true) => {
            fields.remove(ANSWER_KEY_ALIAS);
            ANSWER_KEY
        }
        (true, false) => ANSWER_KEY,
        (false, true) => ANSWER_KEY_ALIAS,
    };

    check_option_count(index, &fields)?;
    let replaced = replace_non_string_answer(index, answer_key, &mut fields);

    let question = serde_json::from_value(Value::Object(fields))
        .map_err(|e| malformed(index, e.to_string()))?;

    Ok((question, replaced))
}

/// Replaces an answer that is not a JSON string (`8`, `null`, ...) with the
/// first option. A number never equals a string option, even `8` and `"8"`.
fn replace_non_string_answer(
    index: usize,
    answer_key: &str,
    fields: &mut Map<String, Value>,
) -> Option<AnswerRepair> {
    let answer = fields.get(answer_key)?;
    if answer.is_string() {
        return None;
    }
    let original = answer.to_string();

    // A non-string first option fails conversion as a malformed record.
    let replacement = fields
        .get("options")
        .and_then(Value::as_array)
        .and_then(|options| options.first())
        .and_then(Value::as_str)?
        .to_string();

    fields.insert(answer_key.to_string(), Value::String(replacement.clone()));

    Some(AnswerRepair {
        index,
        original,
        replacement,
    })
}

fn check_option_count(index: usize, fields: &Map<String, Value>) -> Result<(), ValidationError> {
    let options = fields
        .get("options")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(index, "'options' is not an array"))?;

    if options.len() != OPTION_COUNT {
        return Err(ValidationError::WrongOptionCount {
            index,
            count: options.len(),
        });
    }

    Ok(())
}

/// Replaces an answer that matches no option with the first option.
fn repair_answer(index: usize, question: &mut Question) -> Option<AnswerRepair> {
    if question.answer_in_options() {
        return None;
    }

    let replacement = question.options.first()?.clone();
    let original = std::mem::replace(&mut question.correct_answer, replacement.clone());

    Some(AnswerRepair {
        index,
        original,
        replacement,
    })
}

fn malformed(index: usize, reason: impl Into<String>) -> ValidationError {
    ValidationError::MalformedQuestion {
        index,
        reason: reason.into(),
    }
}
