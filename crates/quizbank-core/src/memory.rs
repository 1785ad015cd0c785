//! In-memory implementations of the I/O seams.
//!
//! Used for bundled content, the simulated remote endpoint, and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::BoxError;
use crate::traits::{ByteFetcher, TextSource};

/// Named text assets held in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAssets {
    assets: HashMap<String, String>,
}

impl InMemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.assets.insert(name.into(), content.into());
        self
    }
}

#[async_trait]
impl TextSource for InMemoryAssets {
    async fn read_text(&self, resource: &str) -> Result<String, BoxError> {
        self.assets
            .get(resource)
            .cloned()
            .ok_or_else(|| format!("asset not found: {resource}").into())
    }
}

/// A fetcher that answers every URL with the same payload after an optional
/// delay, standing in for a remote endpoint.
pub struct CannedFetcher {
    payload: Vec<u8>,
    delay: Duration,
    call_count: AtomicU32,
    last_url: Mutex<Option<String>>,
}

impl CannedFetcher {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            delay: Duration::ZERO,
            call_count: AtomicU32::new(0),
            last_url: Mutex::new(None),
        }
    }

    /// Wait this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of fetches served so far.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The URL of the most recent fetch.
    pub fn last_url(&self) -> Option<String> {
        self.last_url
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ByteFetcher for CannedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BoxError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_url
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(url.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.payload.clone())
    }
}
