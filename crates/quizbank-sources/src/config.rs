//! Quiz source configuration and loader factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizbank_core::catalog::{BuiltinLoader, BuiltinQuiz, SAMPLE_REMOTE_JSON};
use quizbank_core::markup::MarkupLoader;
use quizbank_core::memory::CannedFetcher;
use quizbank_core::remote::RemoteLoader;
use quizbank_core::traits::ContentLoader;

use crate::assets::AssetDir;
use crate::http::HttpFetcher;

/// URL reported by canned sources; nothing is ever requested from it.
const CANNED_URL: &str = "canned://science";

/// Configuration for a single named quiz source.
///
/// Note: Custom Debug impl masks URL query strings, which may carry access tokens.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// An XML document under the asset directory.
    Markup { asset: String },
    /// A JSON document fetched over HTTP.
    Remote {
        url: String,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
    /// The bundled sample JSON payload behind a simulated network delay.
    Canned {
        #[serde(default = "default_canned_delay")]
        delay_ms: u64,
    },
    /// One of the bundled quizzes.
    Builtin { quiz: String },
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceConfig::Markup { asset } => {
                f.debug_struct("Markup").field("asset", asset).finish()
            }
            SourceConfig::Remote { url, timeout_secs } => f
                .debug_struct("Remote")
                .field("url", &mask_query(url))
                .field("timeout_secs", timeout_secs)
                .finish(),
            SourceConfig::Canned { delay_ms } => {
                f.debug_struct("Canned").field("delay_ms", delay_ms).finish()
            }
            SourceConfig::Builtin { quiz } => f.debug_struct("Builtin").field("quiz", quiz).finish(),
        }
    }
}

impl SourceConfig {
    /// Short type label for listings.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceConfig::Markup { .. } => "markup",
            SourceConfig::Remote { .. } => "remote",
            SourceConfig::Canned { .. } => "canned",
            SourceConfig::Builtin { .. } => "builtin",
        }
    }

    /// Where the content comes from, safe to print.
    pub fn location(&self) -> String {
        match self {
            SourceConfig::Markup { asset } => asset.clone(),
            SourceConfig::Remote { url, .. } => mask_query(url),
            SourceConfig::Canned { delay_ms } => format!("sample payload ({delay_ms}ms delay)"),
            SourceConfig::Builtin { quiz } => quiz.clone(),
        }
    }
}

fn mask_query(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{base}?***"),
        None => url.to_string(),
    }
}

fn default_canned_delay() -> u64 {
    2000
}

/// Top-level quizbank configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizbankConfig {
    /// Source configurations keyed by name.
    #[serde(default)]
    pub sources: HashMap<String, SourceConfig>,
    /// Source used when none is named on the command line.
    #[serde(default = "default_source")]
    pub default_source: String,
    /// Root directory for markup assets.
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,
    /// Request timeout for remote sources without their own.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

fn default_source() -> String {
    "math".to_string()
}
fn default_asset_dir() -> PathBuf {
    PathBuf::from("./assets")
}
fn default_http_timeout() -> u64 {
    30
}

impl Default for QuizbankConfig {
    fn default() -> Self {
        let mut config = Self {
            sources: HashMap::new(),
            default_source: default_source(),
            asset_dir: default_asset_dir(),
            http_timeout_secs: default_http_timeout(),
        };
        config.register_builtins();
        config
    }
}

impl QuizbankConfig {
    /// Add the bundled quizzes under their own names unless already defined.
    fn register_builtins(&mut self) {
        for quiz in BuiltinQuiz::ALL {
            self.sources
                .entry(quiz.to_string())
                .or_insert_with(|| SourceConfig::Builtin {
                    quiz: quiz.to_string(),
                });
        }
    }

    /// Look up a source by name.
    pub fn source(&self, name: &str) -> Result<&SourceConfig> {
        self.sources.get(name).with_context(|| {
            let mut known: Vec<&str> = self.sources.keys().map(String::as_str).collect();
            known.sort_unstable();
            format!("unknown source '{name}' (known: {})", known.join(", "))
        })
    }

    /// Source names in sorted order.
    pub fn source_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted verbatim and never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    match config {
        SourceConfig::Markup { asset } => SourceConfig::Markup {
            asset: resolve_env_vars(asset),
        },
        SourceConfig::Remote { url, timeout_secs } => SourceConfig::Remote {
            url: resolve_env_vars(url),
            timeout_secs: *timeout_secs,
        },
        SourceConfig::Canned { delay_ms } => SourceConfig::Canned {
            delay_ms: *delay_ms,
        },
        SourceConfig::Builtin { quiz } => SourceConfig::Builtin {
            quiz: resolve_env_vars(quiz),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizbank.toml` in the current directory
/// 2. `~/.config/quizbank/config.toml`
///
/// Environment variable override: `QUIZBANK_ASSET_DIR`.
pub fn load_config() -> Result<QuizbankConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizbankConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizbank.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizbankConfig::default(),
    };

    Ok(apply_overrides(
        config,
        std::env::var("QUIZBANK_ASSET_DIR").ok(),
    ))
}

/// Parse a config document, resolving `${VAR}` references and adding built-ins.
pub fn parse_config(content: &str) -> Result<QuizbankConfig> {
    let mut config: QuizbankConfig = toml::from_str(content)?;
    config.sources = config
        .sources
        .iter()
        .map(|(k, v)| (k.clone(), resolve_source_config(v)))
        .collect();
    config.register_builtins();
    Ok(config)
}

fn apply_overrides(mut config: QuizbankConfig, asset_dir: Option<String>) -> QuizbankConfig {
    if let Some(dir) = asset_dir.filter(|d| !d.is_empty()) {
        config.asset_dir = PathBuf::from(dir);
    }
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizbank"))
}

/// Create a content loader for a named source.
pub fn create_loader(
    name: &str,
    source: &SourceConfig,
    config: &QuizbankConfig,
) -> Result<Arc<dyn ContentLoader>> {
    match source {
        SourceConfig::Markup { asset } => {
            let assets = Arc::new(AssetDir::new(&config.asset_dir));
            Ok(Arc::new(MarkupLoader::new(asset.clone(), assets)))
        }
        SourceConfig::Remote { url, timeout_secs } => {
            anyhow::ensure!(!url.is_empty(), "source '{name}' has an empty url");
            let timeout = Duration::from_secs(timeout_secs.unwrap_or(config.http_timeout_secs));
            let fetcher = HttpFetcher::with_timeout(timeout)
                .with_context(|| format!("failed to create HTTP client for source '{name}'"))?;
            Ok(Arc::new(RemoteLoader::new(url.clone(), Arc::new(fetcher))))
        }
        SourceConfig::Canned { delay_ms } => {
            let fetcher = CannedFetcher::new(SAMPLE_REMOTE_JSON)
                .with_delay(Duration::from_millis(*delay_ms));
            Ok(Arc::new(RemoteLoader::new(CANNED_URL, Arc::new(fetcher))))
        }
        SourceConfig::Builtin { quiz } => {
            let quiz: BuiltinQuiz = quiz
                .parse()
                .map_err(|e| anyhow::anyhow!("source '{name}': {e}"))?;
            Ok(Arc::new(BuiltinLoader::new(quiz)))
        }
    }
}
