//! Bundled quizzes and sample documents.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::LoadError;
use crate::model::{ModelError, Question, Quiz};
use crate::traits::ContentLoader;

type Entry = (&'static str, [&'static str; 4], i64);

const MATH: &[Entry] = &[
    ("What is 15 + 27?", ["40", "42", "45", "38"], 1),
    ("What is the square root of 64?", ["6", "7", "8", "9"], 2),
    ("What is 12 × 8?", ["84", "96", "104", "92"], 1),
];

const SCIENCE: &[Entry] = &[
    (
        "What is the chemical symbol for water?",
        ["H2O", "CO2", "O2", "H2SO4"],
        0,
    ),
    (
        "How many bones are in the human body?",
        ["196", "206", "216", "226"],
        1,
    ),
    (
        "What planet is closest to the Sun?",
        ["Venus", "Earth", "Mercury", "Mars"],
        2,
    ),
];

const HISTORY: &[Entry] = &[
    (
        "In which year did World War II end?",
        ["1944", "1945", "1946", "1947"],
        1,
    ),
    (
        "Who was the first President of the United States?",
        [
            "Thomas Jefferson",
            "John Adams",
            "George Washington",
            "Benjamin Franklin",
        ],
        2,
    ),
    (
        "Which ancient wonder was located in Alexandria?",
        ["Hanging Gardens", "Lighthouse", "Colossus", "Mausoleum"],
        1,
    ),
];

/// The quizzes compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinQuiz {
    Math,
    Science,
    History,
}

impl BuiltinQuiz {
    pub const ALL: [BuiltinQuiz; 3] = [BuiltinQuiz::Math, BuiltinQuiz::Science, BuiltinQuiz::History];

    /// Build the quiz.
    pub fn quiz(self) -> Result<Quiz, ModelError> {
        let (title, entries) = match self {
            BuiltinQuiz::Math => ("Mathematics Quiz", MATH),
            BuiltinQuiz::Science => ("Science Quiz", SCIENCE),
            BuiltinQuiz::History => ("History Quiz", HISTORY),
        };

        let questions = entries
            .iter()
            .map(|(text, options, correct)| {
                Question::new(*text, options.iter().map(|o| o.to_string()).collect(), *correct)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Quiz::new(title, questions)
    }
}

impl fmt::Display for BuiltinQuiz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuiltinQuiz::Math => write!(f, "math"),
            BuiltinQuiz::Science => write!(f, "science"),
            BuiltinQuiz::History => write!(f, "history"),
        }
    }
}

impl FromStr for BuiltinQuiz {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "math" | "mathematics" => Ok(BuiltinQuiz::Math),
            "science" => Ok(BuiltinQuiz::Science),
            "history" => Ok(BuiltinQuiz::History),
            other => Err(format!("unknown built-in quiz: {other}")),
        }
    }
}

/// Serves one of the bundled quizzes.
pub struct BuiltinLoader {
    quiz: BuiltinQuiz,
}

impl BuiltinLoader {
    pub fn new(quiz: BuiltinQuiz) -> Self {
        Self { quiz }
    }
}

#[async_trait]
impl ContentLoader for BuiltinLoader {
    fn describe(&self) -> String {
        format!("builtin:{}", self.quiz)
    }

    async fn load(&self) -> Result<Quiz, LoadError> {
        self.quiz.quiz().map_err(LoadError::from)
    }
}

/// Payload served by the simulated remote endpoint.
pub const SAMPLE_REMOTE_JSON: &str = r#"{
    "title": "Science Quiz",
    "questions": [
        {
            "question": "What is the chemical symbol for water?",
            "options": ["H2O", "CO2", "NaCl", "O2"],
            "correctAnswer": 0
        },
        {
            "question": "How many bones are in the human body?",
            "options": ["206", "208", "210", "212"],
            "correctAnswer": 0
        },
        {
            "question": "What is the speed of light?",
            "options": ["299,792,458 m/s", "300,000,000 m/s", "250,000,000 m/s", "350,000,000 m/s"],
            "correctAnswer": 0
        },
        {
            "question": "Which gas makes up most of Earth's atmosphere?",
            "options": ["Oxygen", "Nitrogen", "Carbon Dioxide", "Argon"],
            "correctAnswer": 1
        }
    ]
}
"#;

/// Starter markup asset written by `quizbank init`.
pub const SAMPLE_MARKUP: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<quiz title="Geology Basics">
    <question>
        <text>Which of these rocks is igneous?</text>
        <option>Basalt</option>
        <option>Limestone</option>
        <option>Marble</option>
        <option>Shale</option>
        <correct_answer>0</correct_answer>
    </question>
    <question>
        <text>What is the hardest naturally occurring mineral?</text>
        <option>Quartz</option>
        <option>Topaz</option>
        <option>Diamond</option>
        <option>Corundum</option>
        <correct_answer>2</correct_answer>
    </question>
    <question>
        <text>Which layer of the Earth lies directly beneath the crust?</text>
        <option>Outer core</option>
        <option>Mantle</option>
        <option>Inner core</option>
        <option>Lithosphere</option>
        <correct_answer>1</correct_answer>
    </question>
</quiz>
"#;
