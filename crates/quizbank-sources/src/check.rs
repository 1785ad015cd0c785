//! Concurrent health check across configured sources.

use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};

use crate::config::{create_loader, QuizbankConfig};

/// Outcome of loading one source.
#[derive(Debug, Clone)]
pub struct SourceCheck {
    pub name: String,
    /// The loader's description, or the source type if no loader could be built.
    pub describe: String,
    /// Question count on success, error text otherwise.
    pub outcome: Result<usize, String>,
    pub duration_ms: u64,
}

impl SourceCheck {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Load every configured source concurrently.
///
/// Results are sorted by source name.
pub async fn check_sources(config: &QuizbankConfig) -> Vec<SourceCheck> {
    let mut futures = FuturesUnordered::new();

    for (name, source) in &config.sources {
        let name = name.clone();
        let loader = create_loader(&name, source, config);
        let kind = source.kind();

        futures.push(async move {
            let start = Instant::now();
            let (describe, outcome) = match loader {
                Ok(loader) => {
                    let outcome = match loader.load().await {
                        Ok(quiz) => Ok(quiz.len()),
                        Err(e) => Err(e.user_message()),
                    };
                    (loader.describe(), outcome)
                }
                Err(e) => (kind.to_string(), Err(format!("{e:#}"))),
            };
            let duration_ms = start.elapsed().as_millis() as u64;

            match &outcome {
                Ok(count) => tracing::info!(source = %name, questions = count, "source ok"),
                Err(error) => tracing::warn!(source = %name, %error, "source failed"),
            }

            SourceCheck {
                name,
                describe,
                outcome,
                duration_ms,
            }
        });
    }

    let mut results = Vec::with_capacity(futures.len());
    while let Some(check) = futures.next().await {
        results.push(check);
    }
    results.sort_by(|a, b| a.name.cmp(&b.name));
    results
}
