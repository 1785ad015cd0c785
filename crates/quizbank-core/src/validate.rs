//! Non-fatal quality checks for loaded quizzes.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::Quiz;

/// A warning from quiz validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    /// The question index (if applicable).
    pub question_index: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate a quiz for common authoring mistakes.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if quiz.title().trim().is_empty() {
        warnings.push(ValidationWarning {
            question_index: None,
            message: "quiz title is empty".into(),
        });
    }

    let mut seen_prompts = HashSet::new();
    for (index, question) in quiz.questions().iter().enumerate() {
        let prompt = question.text().trim();
        if prompt.is_empty() {
            warnings.push(ValidationWarning {
                question_index: Some(index),
                message: "prompt is empty".into(),
            });
        } else if !seen_prompts.insert(prompt) {
            warnings.push(ValidationWarning {
                question_index: Some(index),
                message: format!("duplicate prompt: {prompt}"),
            });
        }

        let mut seen_options = HashSet::new();
        for option in question.options() {
            let option = option.trim();
            if option.is_empty() {
                warnings.push(ValidationWarning {
                    question_index: Some(index),
                    message: "option text is blank".into(),
                });
            } else if !seen_options.insert(option) {
                warnings.push(ValidationWarning {
                    question_index: Some(index),
                    message: format!("duplicate option: {option}"),
                });
            }
        }
    }

    warnings
}
