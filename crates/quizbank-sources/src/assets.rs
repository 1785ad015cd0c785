//! Asset directory text source.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use quizbank_core::error::BoxError;
use quizbank_core::traits::TextSource;

use crate::error::SourceError;

/// Reads named assets from files under a root directory.
#[derive(Debug, Clone)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an asset name to a path inside the root.
    fn resolve(&self, name: &str) -> Result<PathBuf, SourceError> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if name.is_empty() || escapes {
            return Err(SourceError::InvalidAssetName(name.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl TextSource for AssetDir {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn read_text(&self, resource: &str) -> Result<String, BoxError> {
        let path = self.resolve(resource)?;
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| SourceError::Io {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "read asset");
        Ok(content)
    }
}
