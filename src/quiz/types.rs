//! Question records and question sets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of answer options every question must carry.
pub const OPTION_COUNT: usize = 4;

/// A single multiple-choice question.
///
/// Serialized with the field names the quiz game reads (`question`, `options`,
/// `reponseCorrecte`). `correctAnswer` is accepted as an input alias. Keys the
/// game or the enrichment stage add (`imageUrl`, ...) are kept in `extra` so a
/// question bank survives a read/write cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Question text, expected to end with a question mark.
    pub question: String,
    /// The answer options, in display order.
    pub options: Vec<String>,
    /// The correct answer; must equal one of `options` exactly.
    #[serde(rename = "reponseCorrecte", alias = "correctAnswer")]
    pub correct_answer: String,
    /// Additional keys carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Question {
    /// Creates a question with no extra fields.
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options,
            correct_answer: correct_answer.into(),
            extra: Map::new(),
        }
    }

    /// Returns true if the correct answer is one of the options.
    ///
    /// Comparison is exact: case and whitespace sensitive.
    pub fn answer_in_options(&self) -> bool {
        self.options.iter().any(|o| *o == self.correct_answer)
    }

    /// Returns true if two options carry the same text.
    pub fn has_duplicate_options(&self) -> bool {
        self.options
            .iter()
            .enumerate()
            .any(|(i, o)| self.options[i + 1..].contains(o))
    }
}

/// An ordered set of questions generated by one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }

    /// Returns true if a question with exactly this text is already present.
    pub fn contains_text(&self, text: &str) -> bool {
        self.questions.iter().any(|q| q.question == text)
    }

    pub fn push(&mut self, question: Question) {
        self.questions.push(question);
    }

    pub fn into_inner(self) -> Vec<Question> {
        self.questions
    }
}

impl FromIterator<Question> for QuestionSet {
    fn from_iter<I: IntoIterator<Item = Question>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for QuestionSet {
    type Item = Question;
    type IntoIter = std::vec::IntoIter<Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.into_iter()
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
