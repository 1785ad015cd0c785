//! Tag-structured (XML) quiz loader.
//!
//! Expected shape:
//!
//! ```xml
//! <quiz title="Geology">
//!   <question>
//!     <text>Which rock is igneous?</text>
//!     <option>Basalt</option>
//!     <option>Limestone</option>
//!     <correct_answer>0</correct_answer>
//!   </question>
//! </quiz>
//! ```
//!
//! The document is read as a stream of start/text/end events. The character
//! data of each `text`, `option` and `correct_answer` element is collected
//! until the element closes, so comments and CDATA sections inside it do not
//! split the value. Text under tags the loader does not know is ignored.

use std::sync::Arc;

use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::instrument;

use crate::error::LoadError;
use crate::model::{Question, Quiz};
use crate::traits::{ContentLoader, TextSource};

/// Title used when the root element has no `title` attribute.
pub const FALLBACK_TITLE: &str = "Quiz";

const ROOT_TAG: &str = "quiz";
const QUESTION_TAG: &str = "question";
const TEXT_TAG: &str = "text";
const OPTION_TAG: &str = "option";
const ANSWER_TAG: &str = "correct_answer";

/// Loads a quiz from a named markup resource.
pub struct MarkupLoader {
    resource: String,
    source: Arc<dyn TextSource>,
}

impl MarkupLoader {
    pub fn new(resource: impl Into<String>, source: Arc<dyn TextSource>) -> Self {
        Self {
            resource: resource.into(),
            source,
        }
    }
}

#[async_trait]
impl ContentLoader for MarkupLoader {
    fn describe(&self) -> String {
        format!("markup:{}", self.resource)
    }

    #[instrument(skip(self), fields(resource = %self.resource))]
    async fn load(&self) -> Result<Quiz, LoadError> {
        let content = self
            .source
            .read_text(&self.resource)
            .await
            .map_err(|e| LoadError::unavailable(&self.resource, e))?;
        parse_markup(&content)
    }
}

/// Accumulator for the question currently being read.
#[derive(Default)]
struct PendingQuestion {
    text: String,
    options: Vec<String>,
    correct: i64,
}

/// Parse a markup document into a quiz.
pub fn parse_markup(content: &str) -> Result<Quiz, LoadError> {
    let mut reader = Reader::from_str(content);

    let mut title: Option<String> = None;
    let mut questions = Vec::new();
    let mut pending = PendingQuestion::default();
    // Character data of the innermost open leaf element, across comments and CDATA sections.
    let mut buffer = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| LoadError::malformed(format!("invalid markup: {e}")))?;

        match event {
            Event::Start(tag) => {
                let name = tag_name(&tag);
                if is_leaf(&name) {
                    buffer.clear();
                }
                on_open(&name, &tag, &mut title, &mut pending)?;
            }
            Event::Empty(tag) => {
                let name = tag_name(&tag);
                on_open(&name, &tag, &mut title, &mut pending)?;
                if name == QUESTION_TAG {
                    close_question(&mut pending, &mut questions)?;
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| LoadError::malformed(format!("invalid text: {e}")))?;
                buffer.push_str(&text);
            }
            Event::CData(data) => {
                let raw = data.into_inner();
                buffer.push_str(&String::from_utf8_lossy(&raw));
            }
            Event::End(tag) => {
                let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
                if is_leaf(&name) {
                    route_text(&name, buffer.trim(), &mut pending);
                    buffer.clear();
                } else if name == QUESTION_TAG {
                    close_question(&mut pending, &mut questions)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::debug!(questions = questions.len(), "parsed markup quiz");

    if questions.is_empty() {
        return Err(LoadError::EmptyQuiz);
    }
    let title = title.unwrap_or_else(|| FALLBACK_TITLE.to_string());
    Quiz::new(title, questions).map_err(LoadError::from)
}

fn is_leaf(name: &str) -> bool {
    matches!(name, TEXT_TAG | OPTION_TAG | ANSWER_TAG)
}

fn tag_name(tag: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(tag.name().as_ref()).into_owned()
}

fn on_open(
    name: &str,
    tag: &BytesStart<'_>,
    title: &mut Option<String>,
    pending: &mut PendingQuestion,
) -> Result<(), LoadError> {
    match name {
        ROOT_TAG => {
            let attr = tag
                .try_get_attribute("title")
                .map_err(|e| LoadError::malformed(format!("invalid attribute: {e}")))?;
            if let Some(attr) = attr {
                let value = attr
                    .unescape_value()
                    .map_err(|e| LoadError::malformed(format!("invalid title: {e}")))?;
                *title = Some(value.into_owned());
            }
        }
        QUESTION_TAG => *pending = PendingQuestion::default(),
        _ => {}
    }
    Ok(())
}

fn route_text(tag: &str, text: &str, pending: &mut PendingQuestion) {
    if text.is_empty() {
        return;
    }
    match tag {
        TEXT_TAG => pending.text = text.to_string(),
        OPTION_TAG => pending.options.push(text.to_string()),
        ANSWER_TAG => {
            pending.correct = text.parse().unwrap_or_else(|_| {
                tracing::warn!(value = text, "unparsable correct answer, using option 0");
                0
            });
        }
        _ => {}
    }
}

fn close_question(
    pending: &mut PendingQuestion,
    questions: &mut Vec<Question>,
) -> Result<(), LoadError> {
    let PendingQuestion {
        text,
        options,
        correct,
    } = std::mem::take(pending);
    let index = questions.len();
    let question =
        Question::new(text, options, correct).map_err(|e| LoadError::invalid_question(index, e))?;
    questions.push(question);
    Ok(())
}
