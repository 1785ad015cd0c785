//! Score summary and answer review for a finished session.

use std::fmt;

use serde::Serialize;

use crate::model::Quiz;
use crate::session::RecordedAnswer;

/// Shown in the review when a question was never answered.
pub const NOT_ANSWERED: &str = "Not answered";

/// Performance band derived from the percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    Excellent,
    Good,
    KeepPracticing,
}

impl Grade {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            80.. => Grade::Excellent,
            60..=79 => Grade::Good,
            _ => Grade::KeepPracticing,
        }
    }

    /// Encouragement line for the results screen.
    pub fn message(self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent work!",
            Grade::Good => "Good job!",
            Grade::KeepPracticing => "Keep practicing!",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Review line for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    pub question_index: usize,
    pub prompt: String,
    pub chosen_index: Option<usize>,
    /// Chosen option text, or [`NOT_ANSWERED`].
    pub chosen_text: String,
    pub correct_index: usize,
    pub correct_text: String,
    pub is_correct: bool,
}

/// Summary of a completed quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub title: String,
    pub score: usize,
    pub total: usize,
    /// Whole percent, rounded down.
    pub percentage: u32,
    pub grade: Grade,
    pub review: Vec<ReviewEntry>,
}

impl QuizResult {
    /// Build the summary from the quiz, the running score and the answer log.
    ///
    /// The last recorded answer for a question wins; questions with no
    /// recorded answer are reviewed as incorrect.
    pub fn new(quiz: &Quiz, score: usize, answers: &[RecordedAnswer]) -> Self {
        let total = quiz.len();
        let percentage = if total == 0 {
            0
        } else {
            (score * 100 / total) as u32
        };

        let review = quiz
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let chosen_index = answers
                    .iter()
                    .rev()
                    .find(|a| a.question_index == index)
                    .map(|a| a.chosen_index);
                let chosen_text = chosen_index
                    .and_then(|i| question.options().get(i))
                    .cloned()
                    .unwrap_or_else(|| NOT_ANSWERED.to_string());

                ReviewEntry {
                    question_index: index,
                    prompt: question.text().to_string(),
                    chosen_index,
                    chosen_text,
                    correct_index: question.correct_index(),
                    correct_text: question.correct_option().to_string(),
                    is_correct: chosen_index.is_some_and(|i| question.is_correct(i)),
                }
            })
            .collect();

        Self {
            title: quiz.title().to_string(),
            score,
            total,
            percentage,
            grade: Grade::from_percentage(percentage),
            review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    fn quiz() -> Quiz {
        let q = |text: &str, correct| {
            Question::new(text, vec!["a".into(), "b".into(), "c".into()], correct).unwrap()
        };
        Quiz::new("Letters", vec![q("one", 0), q("two", 1), q("three", 2)]).unwrap()
    }

    #[test]
    fn grade_bands() {
        assert_eq!(Grade::from_percentage(100), Grade::Excellent);
        assert_eq!(Grade::from_percentage(80), Grade::Excellent);
        assert_eq!(Grade::from_percentage(79), Grade::Good);
        assert_eq!(Grade::from_percentage(60), Grade::Good);
        assert_eq!(Grade::from_percentage(59), Grade::KeepPracticing);
        assert_eq!(Grade::from_percentage(0), Grade::KeepPracticing);
    }

    #[test]
    fn percentage_rounds_down() {
        let answers = [
            RecordedAnswer {
                question_index: 0,
                chosen_index: 0,
            },
            RecordedAnswer {
                question_index: 1,
                chosen_index: 1,
            },
            RecordedAnswer {
                question_index: 2,
                chosen_index: 0,
            },
        ];
        let result = QuizResult::new(&quiz(), 2, &answers);
        assert_eq!(result.percentage, 66);
        assert_eq!(result.grade, Grade::Good);
        assert!(result.review[0].is_correct);
        assert!(!result.review[2].is_correct);
        assert_eq!(result.review[2].chosen_text, "a");
        assert_eq!(result.review[2].correct_text, "c");
    }

    #[test]
    fn serializes_for_export() {
        let answers = [RecordedAnswer {
            question_index: 1,
            chosen_index: 1,
        }];
        let result = QuizResult::new(&quiz(), 1, &answers);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["percentage"], 33);
        assert_eq!(json["grade"], "KeepPracticing");
        assert_eq!(json["review"][0]["chosen_index"], serde_json::Value::Null);
        assert_eq!(json["review"][1]["correct_text"], "b");
        assert_eq!(json["review"][1]["is_correct"], true);
    }

    #[test]
    fn unanswered_is_incorrect() {
        let answers = [RecordedAnswer {
            question_index: 0,
            chosen_index: 0,
        }];
        let result = QuizResult::new(&quiz(), 1, &answers);
        assert_eq!(result.review[1].chosen_index, None);
        assert_eq!(result.review[1].chosen_text, NOT_ANSWERED);
        assert!(!result.review[1].is_correct);
        assert_eq!(result.grade, Grade::KeepPracticing);
    }
}
