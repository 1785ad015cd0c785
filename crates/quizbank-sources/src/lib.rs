//! quizbank-sources — Host I/O for quiz content.
//!
//! Implements the `TextSource` and `ByteFetcher` seams for the filesystem and
//! HTTP, and maps named sources from `quizbank.toml` onto content loaders.

pub mod assets;
pub mod check;
pub mod config;
pub mod error;
pub mod http;

pub use assets::AssetDir;
pub use check::{check_sources, SourceCheck};
pub use config::{create_loader, load_config, load_config_from, QuizbankConfig, SourceConfig};
pub use error::SourceError;
pub use http::HttpFetcher;
