//! Source error types.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while reading quiz bytes from the host.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The server answered with an error status.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// The request timed out.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The asset name would escape the asset directory.
    #[error("invalid asset name: {0}")]
    InvalidAssetName(String),

    /// The asset could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
