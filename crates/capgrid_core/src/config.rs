//! Runtime configuration.
//!
//! # Responsibility
//! - Load optional TOML configuration with per-field defaults.
//! - Resolve the summary credential from environment or file.
//!
//! # Invariants
//! - A missing config file is not an error; a malformed one is.
//! - The environment credential wins over the file credential.
//! - Whitespace-only credentials count as missing.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable holding the summary API key.
pub const SUMMARY_API_KEY_ENV: &str = "CAPGRID_SUMMARY_API_KEY";

const DEFAULT_DB_FILE_NAME: &str = "capgrid.sqlite3";
const DEFAULT_SUMMARY_ENDPOINT: &str = "https://api.openai.com/v1";
const DEFAULT_SUMMARY_MODEL: &str = "gpt-4o-mini";
const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 30;

/// Errors from configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// SQLite file holding grid snapshots.
    pub db_path: PathBuf,
    /// Absolute directory for rolling logs; `None` uses the temp dir.
    pub log_dir: Option<PathBuf>,
    /// One of `trace|debug|info|warn|error`; `None` uses the build default.
    pub log_level: Option<String>,
    /// Directory receiving CSV exports.
    pub export_dir: PathBuf,
    pub summary: SummaryConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_dir: None,
            log_level: None,
            export_dir: PathBuf::from("."),
            summary: SummaryConfig::default(),
        }
    }
}

impl GridConfig {
    /// Parses configuration text; absent keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Loads configuration from `path`, or defaults when the file is absent.
    ///
    /// # Errors
    /// - Returns `ConfigError::Io` when the file exists but cannot be read.
    /// - Returns `ConfigError::Parse` when the file is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Log directory to use, falling back to `<temp>/capgrid/logs`.
    pub fn effective_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("capgrid").join("logs"))
    }
}

/// Summary generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Base URL of an OpenAI-compatible API.
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SUMMARY_ENDPOINT.to_string(),
            model: DEFAULT_SUMMARY_MODEL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_SUMMARY_TIMEOUT_SECS,
        }
    }
}

impl SummaryConfig {
    /// Resolves the API key: environment first, then config file.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(std::env::var(SUMMARY_API_KEY_ENV).ok())
    }

    fn resolve_api_key_with(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|key| is_valid_key(key))
            .or_else(|| self.api_key.clone().filter(|key| is_valid_key(key)))
            .map(|key| key.trim().to_string())
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, GridConfig, SummaryConfig};
    use std::path::PathBuf;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = GridConfig::from_toml_str(
            r#"
            db_path = "/var/lib/capgrid/grid.sqlite3"

            [summary]
            model = "local-model"
            "#,
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/capgrid/grid.sqlite3"));
        assert_eq!(config.summary.model, "local-model");
        assert_eq!(config.summary.endpoint, SummaryConfig::default().endpoint);
        assert_eq!(config.export_dir, PathBuf::from("."));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GridConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GridConfig::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "db_path = [").unwrap();
        let err = GridConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn environment_key_wins_over_file_key() {
        let config = SummaryConfig {
            api_key: Some("file-key".to_string()),
            ..SummaryConfig::default()
        };
        assert_eq!(
            config.resolve_api_key_with(Some(" env-key ".to_string())),
            Some("env-key".to_string())
        );
        assert_eq!(
            config.resolve_api_key_with(Some("   ".to_string())),
            Some("file-key".to_string())
        );
    }

    #[test]
    fn blank_keys_count_as_missing() {
        let config = SummaryConfig {
            api_key: Some(" ".to_string()),
            ..SummaryConfig::default()
        };
        assert_eq!(config.resolve_api_key_with(None), None);
    }
}
