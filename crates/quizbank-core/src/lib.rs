//! quizbank-core — Quiz model, content loaders, and the session engine.
//!
//! Loaders turn external documents (XML markup, remote JSON) into the
//! immutable [`model::Quiz`]; [`session::QuizSession`] walks a user through it.

pub mod catalog;
pub mod error;
pub mod markup;
pub mod memory;
pub mod model;
pub mod remote;
pub mod session;
pub mod summary;
pub mod traits;
pub mod validate;

pub use error::{LoadError, LoadErrorKind, TransitionError};
pub use model::{Question, Quiz};
pub use session::{Advance, LoadOutcome, QuizSession, Screen, SessionState};
pub use traits::{ByteFetcher, ContentLoader, TextSource};
