//! Configuration loading for the activity client.
//!
//! Configuration is loaded from a TOML file; every field has a default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Audit log configuration.
    #[serde(default)]
    pub logs: LogConfig,
    /// Activity cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Audit log configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Persisted key-value document holding the log (default: `logs.json`).
    #[serde(default = "default_document")]
    pub document: PathBuf,
    /// Directory exports are written to (default: current directory).
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// File name prefix for exports (default: `activity-logs`).
    #[serde(default = "default_export_prefix")]
    pub export_prefix: String,
}

/// Activity cache configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Characters of payload kept in audit-line previews (default: 200).
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

/// Default for [`LogConfig::export_prefix`].
pub(crate) const DEFAULT_EXPORT_PREFIX: &str = "activity-logs";
/// Default for [`CacheConfig::preview_chars`].
pub(crate) const DEFAULT_PREVIEW_CHARS: usize = 200;

// Default value functions
fn default_document() -> PathBuf {
    PathBuf::from("logs.json")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_export_prefix() -> String {
    DEFAULT_EXPORT_PREFIX.to_string()
}

fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            document: default_document(),
            export_dir: default_export_dir(),
            export_prefix: default_export_prefix(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
        }
    }
}

impl ClientConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Invalid)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Resolve a relative log document path against `data_dir`.
    pub fn with_data_dir(mut self, data_dir: &Path) -> Self {
        if self.logs.document.is_relative() {
            self.logs.document = data_dir.join(&self.logs.document);
        }
        self
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
    /// Failed to parse configuration text.
    #[error("failed to parse config: {0}")]
    Invalid(#[source] toml::de::Error),
}
