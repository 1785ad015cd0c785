//! Quiz session engine.
//!
//! A [`QuizSession`] owns one [`SessionState`] and drives it through
//! `Menu → Loading → InProgress → Completed`, with `Error` reachable from
//! `Loading`. Every operation swaps the whole state under a single lock, so
//! no caller ever observes a half-applied transition.
//!
//! Loading is the only suspending step. It runs on a spawned task and is
//! tagged with a generation number; a result is applied only if its
//! generation is still the latest one and the session is still loading.
//! Returning to the menu or starting another load bumps the generation and
//! aborts the previous task.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

use crate::error::{LoadError, TransitionError};
use crate::model::{Question, Quiz};
use crate::summary::QuizResult;
use crate::traits::ContentLoader;

/// The logical phase of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Screen {
    #[default]
    Menu,
    Loading,
    InProgress,
    Completed,
    Error,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Menu => write!(f, "menu"),
            Screen::Loading => write!(f, "loading"),
            Screen::InProgress => write!(f, "in-progress"),
            Screen::Completed => write!(f, "completed"),
            Screen::Error => write!(f, "error"),
        }
    }
}

/// One answered question, appended on every advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedAnswer {
    pub question_index: usize,
    pub chosen_index: usize,
}

/// Read-only snapshot of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    screen: Screen,
    quiz: Option<Arc<Quiz>>,
    current_index: usize,
    selected_answer: Option<usize>,
    score: usize,
    error_message: String,
    answers: Vec<RecordedAnswer>,
}

/// Per-screen payload for presentation dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenView<'a> {
    Menu,
    Loading,
    InProgress {
        quiz: &'a Quiz,
        index: usize,
        question: &'a Question,
        selected: Option<usize>,
        is_last: bool,
    },
    Completed {
        quiz: &'a Quiz,
        score: usize,
    },
    Error {
        message: &'a str,
    },
}

impl SessionState {
    fn loading() -> Self {
        Self {
            screen: Screen::Loading,
            ..Self::default()
        }
    }

    fn started(quiz: Arc<Quiz>) -> Self {
        Self {
            screen: Screen::InProgress,
            quiz: Some(quiz),
            ..Self::default()
        }
    }

    fn failed(message: String) -> Self {
        Self {
            screen: Screen::Error,
            error_message: message,
            ..Self::default()
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn quiz(&self) -> Option<&Arc<Quiz>> {
        self.quiz.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn selected_answer(&self) -> Option<usize> {
        self.selected_answer
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Empty unless the screen is [`Screen::Error`].
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Answers recorded so far, in the order they were given.
    pub fn answers(&self) -> &[RecordedAnswer] {
        &self.answers
    }

    /// The question on screen; `None` outside [`Screen::InProgress`].
    pub fn current_question(&self) -> Option<&Question> {
        if self.screen != Screen::InProgress {
            return None;
        }
        self.quiz.as_ref()?.question(self.current_index)
    }

    /// `(position, total)` with a 1-based position, e.g. `(2, 5)` for
    /// "Question 2 of 5".
    pub fn progress(&self) -> Option<(usize, usize)> {
        let quiz = self.quiz.as_ref()?;
        Some((self.current_index + 1, quiz.len()))
    }

    pub fn is_last_question(&self) -> bool {
        self.quiz
            .as_ref()
            .is_some_and(|quiz| self.current_index + 1 >= quiz.len())
    }

    /// Whether [`QuizSession::advance`] would do anything.
    pub fn can_advance(&self) -> bool {
        self.screen == Screen::InProgress && self.selected_answer.is_some()
    }

    /// Score summary and review; `Some` only on [`Screen::Completed`].
    pub fn result(&self) -> Option<QuizResult> {
        if self.screen != Screen::Completed {
            return None;
        }
        let quiz = self.quiz.as_ref()?;
        Some(QuizResult::new(quiz, self.score, &self.answers))
    }

    pub fn view(&self) -> ScreenView<'_> {
        match (self.screen, self.quiz.as_deref()) {
            (Screen::Loading, _) => ScreenView::Loading,
            (Screen::Error, _) => ScreenView::Error {
                message: &self.error_message,
            },
            (Screen::InProgress, Some(quiz)) => match quiz.question(self.current_index) {
                Some(question) => ScreenView::InProgress {
                    quiz,
                    index: self.current_index,
                    question,
                    selected: self.selected_answer,
                    is_last: self.is_last_question(),
                },
                None => ScreenView::Menu,
            },
            (Screen::Completed, Some(quiz)) => ScreenView::Completed {
                quiz,
                score: self.score,
            },
            _ => ScreenView::Menu,
        }
    }
}

/// What a [`QuizSession::advance`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// No answer was selected; nothing changed.
    Ignored,
    /// Moved to the next question.
    Next { correct: bool },
    /// The last question was answered.
    Completed { correct: bool, score: usize },
}

/// How a load ended.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The quiz was applied and the session is in progress.
    Ready { questions: usize },
    /// The loader failed and the session shows the error screen.
    Failed(LoadError),
    /// A newer load or a return to the menu replaced this one; its result was dropped.
    Superseded,
    /// The load task was aborted before it finished.
    Cancelled,
}

/// Handle to an in-flight load.
pub struct LoadHandle {
    generation: u64,
    task: JoinHandle<LoadOutcome>,
}

impl LoadHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the load to finish.
    ///
    /// A panicking loader ends as [`LoadOutcome::Failed`] with the session on
    /// the error screen.
    pub async fn wait(self) -> LoadOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => LoadOutcome::Cancelled,
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }
}

struct Inner {
    state: SessionState,
    generation: u64,
    in_flight: Option<AbortHandle>,
}

struct Shared {
    inner: Mutex<Inner>,
    updates: watch::Sender<SessionState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the state and publish the new snapshot.
    fn commit(&self, inner: &mut Inner, next: SessionState) {
        inner.state = next;
        self.updates.send_replace(inner.state.clone());
    }

    fn finish_load(&self, generation: u64, result: Result<Quiz, LoadError>) -> LoadOutcome {
        let mut inner = self.lock();
        if inner.generation != generation || inner.state.screen != Screen::Loading {
            tracing::debug!(
                generation,
                current = inner.generation,
                "discarding superseded load"
            );
            return LoadOutcome::Superseded;
        }
        inner.in_flight = None;

        match result {
            Ok(quiz) => {
                let questions = quiz.len();
                tracing::info!(title = quiz.title(), questions, "quiz ready");
                self.commit(&mut inner, SessionState::started(Arc::new(quiz)));
                LoadOutcome::Ready { questions }
            }
            Err(err) => {
                tracing::info!(kind = %err.kind(), "quiz load failed: {err}");
                self.commit(&mut inner, SessionState::failed(err.user_message()));
                LoadOutcome::Failed(err)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn reject(operation: &'static str, screen: Screen) -> TransitionError {
    tracing::warn!(operation, %screen, "operation rejected");
    TransitionError::InvalidScreen { operation, screen }
}

/// The session engine. Cheap to share by reference; all operations take `&self`.
pub struct QuizSession {
    shared: Arc<Shared>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    /// A new session on the menu screen.
    pub fn new() -> Self {
        let (updates, _) = watch::channel(SessionState::default());
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: SessionState::default(),
                    generation: 0,
                    in_flight: None,
                }),
                updates,
            }),
        }
    }

    /// Current state.
    pub fn snapshot(&self) -> SessionState {
        self.shared.lock().state.clone()
    }

    /// Observe every state published from now on.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.updates.subscribe()
    }

    /// Start loading a quiz. Allowed from the menu, or while another load is
    /// running, in which case that load is superseded.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn request_load(
        &self,
        loader: Arc<dyn ContentLoader>,
    ) -> Result<LoadHandle, TransitionError> {
        let mut inner = self.shared.lock();
        let screen = inner.state.screen;
        if !matches!(screen, Screen::Menu | Screen::Loading) {
            return Err(reject("request_load", screen));
        }

        if let Some(previous) = inner.in_flight.take() {
            tracing::debug!(generation = inner.generation, "superseding in-flight load");
            previous.abort();
        }
        inner.generation += 1;
        let generation = inner.generation;
        self.shared.commit(&mut inner, SessionState::loading());
        tracing::info!(source = %loader.describe(), generation, "loading quiz");

        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            let result = match AssertUnwindSafe(loader.load()).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::error!(source = %loader.describe(), %message, "loader panicked");
                    Err(LoadError::unavailable(
                        loader.describe(),
                        format!("loader panicked: {message}"),
                    ))
                }
            };
            shared.finish_load(generation, result)
        });
        inner.in_flight = Some(task.abort_handle());

        Ok(LoadHandle { generation, task })
    }

    /// Choose an option for the current question.
    ///
    /// Out-of-range indices are rejected without touching the state.
    pub fn select_answer(&self, index: usize) -> Result<(), TransitionError> {
        let mut inner = self.shared.lock();
        let Some(question) = inner.state.current_question() else {
            return Err(reject("select_answer", inner.state.screen));
        };
        let options = question.options().len();
        if index >= options {
            tracing::warn!(index, options, "answer index out of range");
            return Err(TransitionError::OptionOutOfRange { index, options });
        }

        let next = SessionState {
            selected_answer: Some(index),
            ..inner.state.clone()
        };
        self.shared.commit(&mut inner, next);
        Ok(())
    }

    pub fn can_advance(&self) -> bool {
        self.shared.lock().state.can_advance()
    }

    /// Score the selected answer and move on. Without a selection this is a
    /// no-op returning [`Advance::Ignored`].
    pub fn advance(&self) -> Result<Advance, TransitionError> {
        let mut inner = self.shared.lock();
        let state = &inner.state;
        let Some(question) = state.current_question() else {
            return Err(reject("advance", state.screen));
        };
        let Some(chosen) = state.selected_answer else {
            tracing::debug!("advance without a selected answer ignored");
            return Ok(Advance::Ignored);
        };

        let correct = question.is_correct(chosen);
        let is_last = state.is_last_question();
        let mut next = state.clone();
        next.answers.push(RecordedAnswer {
            question_index: state.current_index,
            chosen_index: chosen,
        });
        if correct {
            next.score += 1;
        }

        let outcome = if is_last {
            next.screen = Screen::Completed;
            tracing::info!(score = next.score, total = next.answers.len(), "quiz completed");
            Advance::Completed {
                correct,
                score: next.score,
            }
        } else {
            next.current_index += 1;
            next.selected_answer = None;
            Advance::Next { correct }
        };

        self.shared.commit(&mut inner, next);
        Ok(outcome)
    }

    /// Replay the completed quiz from the first question without reloading it.
    pub fn restart(&self) -> Result<(), TransitionError> {
        let mut inner = self.shared.lock();
        let quiz = match (&inner.state.screen, &inner.state.quiz) {
            (Screen::Completed, Some(quiz)) => Arc::clone(quiz),
            _ => return Err(reject("restart", inner.state.screen)),
        };
        tracing::info!(title = quiz.title(), "restarting quiz");
        self.shared.commit(&mut inner, SessionState::started(quiz));
        Ok(())
    }

    /// Same as [`QuizSession::restart`].
    pub fn retry(&self) -> Result<(), TransitionError> {
        self.restart()
    }

    /// Reset to a fresh menu state from anywhere, invalidating any in-flight load.
    pub fn back_to_menu(&self) {
        let mut inner = self.shared.lock();
        if let Some(in_flight) = inner.in_flight.take() {
            in_flight.abort();
        }
        inner.generation += 1;
        self.shared.commit(&mut inner, SessionState::default());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::catalog::{BuiltinLoader, BuiltinQuiz};
    use crate::error::LoadErrorKind;
    use crate::markup::MarkupLoader;
    use crate::memory::{CannedFetcher, InMemoryAssets};
    use crate::remote::RemoteLoader;

    const ONE_QUESTION: &str = r#"<quiz title="T"><question><text>2+2?</text><option>3</option><option>4</option><correct_answer>1</correct_answer></question></quiz>"#;

    fn markup_loader(xml: &str) -> Arc<dyn ContentLoader> {
        let assets = InMemoryAssets::new().with_asset("quiz.xml", xml);
        Arc::new(MarkupLoader::new("quiz.xml", Arc::new(assets)))
    }

    fn remote_loader(json: &str, delay: Duration) -> Arc<dyn ContentLoader> {
        let fetcher = CannedFetcher::new(json).with_delay(delay);
        Arc::new(RemoteLoader::new("https://quiz.test", Arc::new(fetcher)))
    }

    fn builtin(quiz: BuiltinQuiz) -> Arc<dyn ContentLoader> {
        Arc::new(BuiltinLoader::new(quiz))
    }

    fn titled_json(title: &str) -> String {
        format!(
            r#"{{"title":"{title}","questions":[{{"question":"q","options":["a","b"],"correctAnswer":0}}]}}"#
        )
    }

    async fn loaded(loader: Arc<dyn ContentLoader>) -> QuizSession {
        let session = QuizSession::new();
        let outcome = session.request_load(loader).unwrap().wait().await;
        assert!(matches!(outcome, LoadOutcome::Ready { .. }), "{outcome:?}");
        session
    }

    #[tokio::test]
    async fn answer_single_question_correctly() {
        let session = loaded(markup_loader(ONE_QUESTION)).await;
        let state = session.snapshot();
        assert_eq!(state.screen(), Screen::InProgress);
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.score(), 0);
        assert_eq!(state.current_question().unwrap().text(), "2+2?");

        session.select_answer(1).unwrap();
        assert_eq!(
            session.advance().unwrap(),
            Advance::Completed {
                correct: true,
                score: 1
            }
        );

        let state = session.snapshot();
        assert_eq!(state.screen(), Screen::Completed);
        assert_eq!(state.score(), 1);
        assert!(state.quiz().is_some());
    }

    #[tokio::test]
    async fn wrong_answer_on_last_question_keeps_score() {
        let session = loaded(markup_loader(ONE_QUESTION)).await;
        session.select_answer(0).unwrap();
        assert_eq!(
            session.advance().unwrap(),
            Advance::Completed {
                correct: false,
                score: 0
            }
        );
        let result = session.snapshot().result().unwrap();
        assert_eq!(result.score, 0);
        assert!(!result.review[0].is_correct);
    }

    #[tokio::test]
    async fn advance_without_selection_is_noop() {
        let session = loaded(builtin(BuiltinQuiz::Math)).await;
        let before = session.snapshot();
        assert!(!session.can_advance());
        assert_eq!(session.advance().unwrap(), Advance::Ignored);
        assert_eq!(session.snapshot(), before);
    }

    #[tokio::test]
    async fn out_of_range_selection_is_rejected() {
        let session = loaded(builtin(BuiltinQuiz::Math)).await;
        session.select_answer(2).unwrap();
        let before = session.snapshot();
        assert_eq!(
            session.select_answer(4),
            Err(TransitionError::OptionOutOfRange {
                index: 4,
                options: 4
            })
        );
        assert_eq!(session.snapshot(), before);
        assert_eq!(before.selected_answer(), Some(2));
    }

    #[test]
    fn operations_outside_quiz_are_rejected() {
        let session = QuizSession::new();
        assert!(matches!(
            session.select_answer(0),
            Err(TransitionError::InvalidScreen {
                screen: Screen::Menu,
                ..
            })
        ));
        assert!(session.advance().is_err());
        assert!(session.restart().is_err());
        assert_eq!(session.snapshot(), SessionState::default());
    }

    #[tokio::test]
    async fn advancing_clears_selection_and_scores() {
        let session = loaded(builtin(BuiltinQuiz::Math)).await;
        session.select_answer(1).unwrap();
        assert!(session.can_advance());
        assert_eq!(session.advance().unwrap(), Advance::Next { correct: true });

        let state = session.snapshot();
        assert_eq!(state.current_index(), 1);
        assert_eq!(state.selected_answer(), None);
        assert_eq!(state.score(), 1);
        assert_eq!(state.progress(), Some((2, 3)));
        assert!(!state.is_last_question());

        session.select_answer(0).unwrap();
        assert_eq!(session.advance().unwrap(), Advance::Next { correct: false });
        assert!(session.snapshot().is_last_question());
        session.select_answer(1).unwrap();
        session.advance().unwrap();

        let state = session.snapshot();
        assert_eq!(state.screen(), Screen::Completed);
        assert_eq!(state.score(), 2);
        assert_eq!(
            state.answers(),
            &[
                RecordedAnswer {
                    question_index: 0,
                    chosen_index: 1
                },
                RecordedAnswer {
                    question_index: 1,
                    chosen_index: 0
                },
                RecordedAnswer {
                    question_index: 2,
                    chosen_index: 1
                },
            ]
        );
        let result = state.result().unwrap();
        assert_eq!(result.percentage, 66);
        assert!(matches!(state.view(), ScreenView::Completed { score: 2, .. }));
    }

    #[tokio::test]
    async fn restart_keeps_the_same_quiz() {
        let session = loaded(markup_loader(ONE_QUESTION)).await;
        session.select_answer(1).unwrap();
        session.advance().unwrap();
        let completed = session.snapshot();

        session.restart().unwrap();
        let state = session.snapshot();
        assert_eq!(state.screen(), Screen::InProgress);
        assert_eq!(state.score(), 0);
        assert_eq!(state.current_index(), 0);
        assert!(state.answers().is_empty());
        assert!(Arc::ptr_eq(
            state.quiz().unwrap(),
            completed.quiz().unwrap()
        ));

        assert!(session.restart().is_err());
    }

    #[tokio::test]
    async fn back_to_menu_resets_from_every_screen() {
        let fresh = SessionState::default();

        let session = loaded(markup_loader(ONE_QUESTION)).await;
        session.select_answer(1).unwrap();
        session.back_to_menu();
        assert_eq!(session.snapshot(), fresh);

        let session = loaded(markup_loader(ONE_QUESTION)).await;
        session.select_answer(1).unwrap();
        session.advance().unwrap();
        session.back_to_menu();
        assert_eq!(session.snapshot(), fresh);

        let session = QuizSession::new();
        let outcome = session
            .request_load(markup_loader("<quiz/>"))
            .unwrap()
            .wait()
            .await;
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        session.back_to_menu();
        assert_eq!(session.snapshot(), fresh);

        session.back_to_menu();
        assert_eq!(session.snapshot(), fresh);
    }

    #[tokio::test]
    async fn empty_remote_quiz_shows_error() {
        let session = QuizSession::new();
        let handle = session
            .request_load(remote_loader(r#"{"title":"S","questions":[]}"#, Duration::ZERO))
            .unwrap();
        match handle.wait().await {
            LoadOutcome::Failed(err) => assert_eq!(err.kind(), LoadErrorKind::EmptyQuiz),
            other => panic!("unexpected outcome: {other:?}"),
        }

        let state = session.snapshot();
        assert_eq!(state.screen(), Screen::Error);
        assert!(state.quiz().is_none());
        assert_eq!(
            state.error_message(),
            "The quiz does not contain any questions"
        );
        assert!(matches!(state.view(), ScreenView::Error { .. }));

        assert!(session.request_load(markup_loader(ONE_QUESTION)).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn stays_loading_until_the_fetch_resolves() {
        let session = QuizSession::new();
        let mut updates = session.subscribe();
        let _handle = session
            .request_load(remote_loader(&titled_json("Slow"), Duration::from_secs(2)))
            .unwrap();

        assert_eq!(session.snapshot().screen(), Screen::Loading);
        assert_eq!(session.snapshot().view(), ScreenView::Loading);
        assert!(session.select_answer(0).is_err());
        assert!(!session.can_advance());

        let ready = updates
            .wait_for(|s| s.screen() != Screen::Loading)
            .await
            .unwrap()
            .clone();
        assert_eq!(ready.screen(), Screen::InProgress);
    }

    #[tokio::test(start_paused = true)]
    async fn only_the_latest_load_is_applied() {
        let session = QuizSession::new();
        let first = session
            .request_load(remote_loader(&titled_json("First"), Duration::from_secs(5)))
            .unwrap();
        let second = session
            .request_load(remote_loader(&titled_json("Second"), Duration::from_secs(1)))
            .unwrap();
        assert!(second.generation() > first.generation());

        assert!(matches!(second.wait().await, LoadOutcome::Ready { .. }));
        assert!(matches!(
            first.wait().await,
            LoadOutcome::Cancelled | LoadOutcome::Superseded
        ));

        tokio::time::sleep(Duration::from_secs(10)).await;
        let state = session.snapshot();
        assert_eq!(state.screen(), Screen::InProgress);
        assert_eq!(state.quiz().unwrap().title(), "Second");
    }

    #[tokio::test(start_paused = true)]
    async fn returning_to_menu_cancels_the_load() {
        let session = QuizSession::new();
        let handle = session
            .request_load(remote_loader(&titled_json("Late"), Duration::from_secs(3)))
            .unwrap();
        session.back_to_menu();

        assert!(matches!(
            handle.wait().await,
            LoadOutcome::Cancelled | LoadOutcome::Superseded
        ));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(session.snapshot(), SessionState::default());
    }

    #[tokio::test]
    async fn superseded_result_is_discarded() {
        let session = QuizSession::new();
        let handle = session.request_load(markup_loader(ONE_QUESTION)).unwrap();
        let generation = handle.generation();
        assert!(matches!(handle.wait().await, LoadOutcome::Ready { .. }));

        session.back_to_menu();
        let outcome = session.shared.finish_load(
            generation,
            Ok(BuiltinQuiz::History.quiz().unwrap()),
        );
        assert!(matches!(outcome, LoadOutcome::Superseded));
        assert_eq!(session.snapshot(), SessionState::default());
    }

    struct PanickingLoader;

    #[async_trait::async_trait]
    impl ContentLoader for PanickingLoader {
        fn describe(&self) -> String {
            "broken".to_string()
        }

        async fn load(&self) -> Result<Quiz, LoadError> {
            panic!("asset table corrupted")
        }
    }

    #[tokio::test]
    async fn panicking_loader_shows_error_screen() {
        let session = QuizSession::new();
        let outcome = session
            .request_load(Arc::new(PanickingLoader))
            .unwrap()
            .wait()
            .await;
        match outcome {
            LoadOutcome::Failed(err) => assert_eq!(err.kind(), LoadErrorKind::SourceUnavailable),
            other => panic!("unexpected outcome: {other:?}"),
        }

        let state = session.snapshot();
        assert_eq!(state.screen(), Screen::Error);
        assert!(state.error_message().contains("loader panicked: asset table corrupted"));

        session.back_to_menu();
        assert!(session.request_load(markup_loader(ONE_QUESTION)).is_ok());
    }

    #[tokio::test]
    async fn subscribers_see_each_transition() {
        let session = QuizSession::new();
        let mut updates = session.subscribe();
        let handle = session.request_load(markup_loader(ONE_QUESTION)).unwrap();
        handle.wait().await;

        let state = updates
            .wait_for(|s| s.screen() == Screen::InProgress)
            .await
            .unwrap()
            .clone();
        assert_eq!(state.quiz().unwrap().title(), "T");

        session.select_answer(1).unwrap();
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().selected_answer(), Some(1));
    }
}
