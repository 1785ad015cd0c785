//! HTTP byte fetcher.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use quizbank_core::error::BoxError;
use quizbank_core::traits::ByteFetcher;

use crate::error::SourceError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches quiz documents over HTTP(S) with a GET request.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, SourceError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl ByteFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BoxError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout(self.timeout)
                } else {
                    SourceError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(SourceError::Http {
                status,
                url: url.to_string(),
            }
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("failed to read response body: {e}")))?;
        tracing::debug!(status, bytes = bytes.len(), "fetched");
        Ok(bytes.to_vec())
    }
}
