//! JSON quiz loader for remote endpoints.
//!
//! The document is tree-shaped, so it is deserialized directly and then
//! validated question by question. Acquiring the bytes is delegated to an
//! injected [`ByteFetcher`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use crate::error::LoadError;
use crate::model::{Question, Quiz};
use crate::traits::{ByteFetcher, ContentLoader};

/// Wire format of a remote quiz.
#[derive(Debug, Deserialize)]
struct RemoteQuiz {
    title: String,
    questions: Vec<RemoteQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: i64,
}

/// Loads a quiz from a URL through a [`ByteFetcher`].
pub struct RemoteLoader {
    url: String,
    fetcher: Arc<dyn ByteFetcher>,
    timeout: Option<Duration>,
}

impl RemoteLoader {
    pub fn new(url: impl Into<String>, fetcher: Arc<dyn ByteFetcher>) -> Self {
        Self {
            url: url.into(),
            fetcher,
            timeout: None,
        }
    }

    /// Give up on the fetch after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        let fetch = self.fetcher.fetch(&self.url);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, fetch).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(LoadError::unavailable(
                        &self.url,
                        format!("timed out after {}ms", limit.as_millis()),
                    ))
                }
            },
            None => fetch.await,
        };
        result.map_err(|e| LoadError::unavailable(&self.url, e))
    }
}

#[async_trait]
impl ContentLoader for RemoteLoader {
    fn describe(&self) -> String {
        format!("remote:{}", self.url)
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn load(&self) -> Result<Quiz, LoadError> {
        let bytes = self.fetch().await?;
        tracing::debug!(bytes = bytes.len(), "fetched remote quiz");
        parse_remote(&bytes)
    }
}

/// Parse and validate a JSON quiz document.
pub fn parse_remote(bytes: &[u8]) -> Result<Quiz, LoadError> {
    let parsed: RemoteQuiz = serde_json::from_slice(bytes)
        .map_err(|e| LoadError::malformed(format!("invalid quiz JSON: {e}")))?;

    if parsed.questions.is_empty() {
        return Err(LoadError::EmptyQuiz);
    }

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(index, q)| {
            Question::new(q.question, q.options, q.correct_answer)
                .map_err(|e| LoadError::invalid_question(index, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Quiz::new(parsed.title, questions).map_err(LoadError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BoxError, LoadErrorKind};
    use crate::memory::CannedFetcher;
    use crate::traits::fetch_fn;

    const VALID: &str = r#"{
        "title": "Science Quiz",
        "questions": [
            {"question": "Symbol for water?", "options": ["H2O", "CO2"], "correctAnswer": 0},
            {"question": "Main gas in air?", "options": ["Oxygen", "Nitrogen", "Argon"], "correctAnswer": 1}
        ]
    }"#;

    #[test]
    fn parse_valid_document() {
        let quiz = parse_remote(VALID.as_bytes()).unwrap();
        assert_eq!(quiz.title(), "Science Quiz");
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz.questions()[1].correct_option(), "Nitrogen");
    }

    #[test]
    fn empty_questions_is_empty_quiz() {
        let err = parse_remote(br#"{"title":"S","questions":[]}"#).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::EmptyQuiz);
    }

    #[test]
    fn out_of_range_answer_names_question() {
        for bad in [2, 3, -1, 100] {
            let doc = format!(
                r#"{{"title":"S","questions":[
                    {{"question":"ok","options":["a","b"],"correctAnswer":0}},
                    {{"question":"bad","options":["a","b"],"correctAnswer":{bad}}}
                ]}}"#
            );
            let err = parse_remote(doc.as_bytes()).unwrap_err();
            assert_eq!(err.kind(), LoadErrorKind::MalformedContent, "answer {bad}");
            assert!(err.to_string().contains("question 1"), "got: {err}");
        }
    }

    #[test]
    fn missing_fields_are_malformed() {
        let err = parse_remote(br#"{"title":"S","questions":[{"question":"q"}]}"#).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::MalformedContent);

        let err = parse_remote(b"not json").unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::MalformedContent);
    }

    #[tokio::test]
    async fn loader_uses_fetcher() {
        let fetcher = Arc::new(CannedFetcher::new(VALID));
        let loader = RemoteLoader::new("https://quiz.test/science", fetcher.clone());
        let quiz = loader.load().await.unwrap();
        assert_eq!(quiz.len(), 2);
        assert_eq!(fetcher.last_url().as_deref(), Some("https://quiz.test/science"));
        assert_eq!(loader.describe(), "remote:https://quiz.test/science");
    }

    #[tokio::test]
    async fn transport_failure_is_unavailable() {
        let fetcher = fetch_fn(|_url: String| async {
            Err::<Vec<u8>, BoxError>("connection refused".into())
        });
        let loader = RemoteLoader::new("https://quiz.test/down", Arc::new(fetcher));
        let err = loader.load().await.unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::SourceUnavailable);
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_times_out() {
        let fetcher = CannedFetcher::new(VALID).with_delay(Duration::from_secs(10));
        let loader = RemoteLoader::new("https://quiz.test/slow", Arc::new(fetcher))
            .with_timeout(Duration::from_secs(1));
        let err = loader.load().await.unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::SourceUnavailable);
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn tolerates_delay_within_timeout() {
        let fetcher = CannedFetcher::new(VALID).with_delay(Duration::from_secs(2));
        let loader = RemoteLoader::new("https://quiz.test/slow", Arc::new(fetcher))
            .with_timeout(Duration::from_secs(5));
        assert!(loader.load().await.is_ok());
    }
}
