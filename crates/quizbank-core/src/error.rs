//! Error types shared by the loaders and the session engine.
//!
//! Loader failures are classified into three kinds so the session engine can
//! turn them into a user-facing message without string matching.

use std::fmt;

use thiserror::Error;

use crate::model::ModelError;
use crate::session::Screen;

/// Boxed transport error carried inside [`LoadError::SourceUnavailable`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by a content loader.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The bytes behind the source could not be obtained.
    #[error("source '{resource}' is unavailable: {source}")]
    SourceUnavailable {
        resource: String,
        #[source]
        source: BoxError,
    },

    /// Bytes were obtained but do not describe a valid quiz.
    #[error("malformed quiz content: {0}")]
    MalformedContent(String),

    /// The document is well-formed but has no questions.
    #[error("quiz contains no questions")]
    EmptyQuiz,
}

/// The kind of a [`LoadError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadErrorKind {
    SourceUnavailable,
    MalformedContent,
    EmptyQuiz,
}

impl fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadErrorKind::SourceUnavailable => write!(f, "source unavailable"),
            LoadErrorKind::MalformedContent => write!(f, "malformed content"),
            LoadErrorKind::EmptyQuiz => write!(f, "empty quiz"),
        }
    }
}

impl LoadError {
    pub fn unavailable(resource: impl Into<String>, source: impl Into<BoxError>) -> Self {
        LoadError::SourceUnavailable {
            resource: resource.into(),
            source: source.into(),
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        LoadError::MalformedContent(detail.into())
    }

    /// Map a model invariant violation found in question `index`.
    pub fn invalid_question(index: usize, err: ModelError) -> Self {
        match err {
            ModelError::NoQuestions => LoadError::EmptyQuiz,
            other => LoadError::MalformedContent(format!("question {index}: {other}")),
        }
    }

    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::SourceUnavailable { .. } => LoadErrorKind::SourceUnavailable,
            LoadError::MalformedContent(_) => LoadErrorKind::MalformedContent,
            LoadError::EmptyQuiz => LoadErrorKind::EmptyQuiz,
        }
    }

    /// The message shown on the error screen.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::SourceUnavailable { resource, source } => {
                format!("Could not reach quiz source '{resource}': {source}")
            }
            LoadError::MalformedContent(detail) => format!("Quiz content is malformed: {detail}"),
            LoadError::EmptyQuiz => "The quiz does not contain any questions".to_string(),
        }
    }
}

impl From<ModelError> for LoadError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NoQuestions => LoadError::EmptyQuiz,
            other => LoadError::MalformedContent(other.to_string()),
        }
    }
}

/// A session operation was invoked in a state that does not allow it.
///
/// The session state is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{operation} is not allowed on the {screen} screen")]
    InvalidScreen {
        operation: &'static str,
        screen: Screen,
    },

    #[error("option {index} does not exist, the question has {options} options")]
    OptionOutOfRange { index: usize, options: usize },
}
