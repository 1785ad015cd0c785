//! Core data model types for quizbank.
//!
//! `Question` and `Quiz` are immutable once constructed: the only way to build
//! one is through a validating constructor, so every value that exists satisfies
//! the option-count and answer-index invariants.

use serde::Serialize;
use thiserror::Error;

/// Minimum number of options a question must offer.
pub const MIN_OPTIONS: usize = 2;

/// Violations of the model invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A question offers fewer than [`MIN_OPTIONS`] choices.
    #[error("expected at least {MIN_OPTIONS} options, found {found}")]
    TooFewOptions { found: usize },

    /// The correct-answer index does not point at one of the options.
    #[error("correct answer {index} is out of range for {options} options")]
    AnswerOutOfRange { index: i64, options: usize },

    /// A quiz was built without any questions.
    #[error("quiz has no questions")]
    NoQuestions,
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_index: usize,
}

impl Question {
    /// Build a question, checking the option count and answer index.
    ///
    /// The index is taken as `i64` so that negative values coming from
    /// external documents are reported rather than wrapped.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: i64,
    ) -> Result<Self, ModelError> {
        if options.len() < MIN_OPTIONS {
            return Err(ModelError::TooFewOptions {
                found: options.len(),
            });
        }
        let index = usize::try_from(correct_index)
            .ok()
            .filter(|i| *i < options.len())
            .ok_or(ModelError::AnswerOutOfRange {
                index: correct_index,
                options: options.len(),
            })?;

        Ok(Self {
            text: text.into(),
            options,
            correct_index: index,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// Text of the correct option.
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    pub fn is_correct(&self, chosen: usize) -> bool {
        chosen == self.correct_index
    }
}

/// An ordered set of questions under a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quiz {
    title: String,
    questions: Vec<Question>,
}

impl Quiz {
    /// Build a quiz. Insertion order is presentation order.
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Result<Self, ModelError> {
        if questions.is_empty() {
            return Err(ModelError::NoQuestions);
        }
        Ok(Self {
            title: title.into(),
            questions,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Number of questions; never zero.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false` for a constructed quiz.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
