//! Core trait definitions for content loading and host I/O.
//!
//! `ContentLoader` is what the session engine consumes. `TextSource` and
//! `ByteFetcher` are the only seams to the host environment; the
//! `quizbank-sources` crate implements them for the filesystem and HTTP.

use std::future::Future;

use async_trait::async_trait;

use crate::error::{BoxError, LoadError};
use crate::model::Quiz;

// ---------------------------------------------------------------------------
// Content loader
// ---------------------------------------------------------------------------

/// A strategy that produces a complete, validated quiz from some source.
///
/// A load either returns a quiz that satisfies every model invariant or
/// fails; partial results are never returned.
#[async_trait]
pub trait ContentLoader: Send + Sync {
    /// Short description of the source (e.g. "markup:geology1.xml").
    fn describe(&self) -> String;

    /// Acquire and parse the quiz.
    async fn load(&self) -> Result<Quiz, LoadError>;
}

// ---------------------------------------------------------------------------
// Host I/O seams
// ---------------------------------------------------------------------------

/// Reads a named resource (e.g. a bundled asset) as text.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn read_text(&self, resource: &str) -> Result<String, BoxError>;
}

/// Fetches the raw bytes behind a URL or endpoint identifier.
#[async_trait]
pub trait ByteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BoxError>;
}

/// A [`ByteFetcher`] backed by an async function.
///
/// Built with [`fetch_fn`].
pub struct FetchFn<F> {
    f: F,
}

/// Wrap an async function as a [`ByteFetcher`].
///
/// ```
/// use quizbank_core::error::BoxError;
/// use quizbank_core::traits::fetch_fn;
///
/// let fetcher = fetch_fn(|_url: String| async { Ok::<_, BoxError>(b"{}".to_vec()) });
/// # let _ = &fetcher;
/// ```
pub fn fetch_fn<F, Fut>(f: F) -> FetchFn<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<u8>, BoxError>> + Send + 'static,
{
    FetchFn { f }
}

#[async_trait]
impl<F, Fut> ByteFetcher for FetchFn<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<u8>, BoxError>> + Send + 'static,
{
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BoxError> {
        (self.f)(url.to_string()).await
    }
}
