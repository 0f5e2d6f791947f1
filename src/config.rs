//! Persisted application settings loaded from `config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;
use crate::session::UserIdentity;

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "GINILAB_API_URL";

/// Errors that may occur while loading app configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No usable config directory found.
    #[error("No suitable config directory found: {0}")]
    Dir(#[from] app_dirs::AppDirError),
    /// Failed to read the config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse the TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// The configured backend URL is not a usable http(s) URL.
    #[error("Invalid backend URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Aggregate application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Identity handed over by an external sign-in step, if any.
    #[serde(default)]
    pub session: Option<UserIdentity>,
}

/// Where the backend lives and how long a request may take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Time-to-live for cached backend lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_features_ttl_secs")]
    pub features_ttl_secs: u64,
    #[serde(default = "default_saved_graphs_ttl_secs")]
    pub saved_graphs_ttl_secs: u64,
}

impl CacheSettings {
    pub fn features_ttl(&self) -> Duration {
        Duration::from_secs(self.features_ttl_secs)
    }

    pub fn saved_graphs_ttl(&self) -> Duration {
        Duration::from_secs(self.saved_graphs_ttl_secs)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            features_ttl_secs: default_features_ttl_secs(),
            saved_graphs_ttl_secs: default_saved_graphs_ttl_secs(),
        }
    }
}

/// Tracing filter and log retention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_features_ttl_secs() -> u64 {
    300
}

fn default_saved_graphs_ttl_secs() -> u64 {
    60
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    10
}

/// Resolve the configuration file path inside the app directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from disk, returning defaults if the file is missing.
///
/// `GINILAB_API_URL` replaces the configured base URL when set.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    let mut config = load_from(&config_path()?)?;
    if let Ok(url) = std::env::var(API_URL_ENV) {
        tracing::info!(%url, "Backend URL overridden from environment");
        config.api.base_url = url;
    }
    config.api.base_url = normalize_base_url(&config.api.base_url)?;
    Ok(config)
}

/// Parse a config file, treating a missing file as all defaults.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file; using defaults");
        return Ok(AppConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Validate an http(s) base URL and strip any trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };
    let parsed = url::Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.cache.features_ttl(), Duration::from_secs(300));
        assert_eq!(config.cache.saved_graphs_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn partial_tables_fill_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"
[api]
base_url = "http://web-api:4000"

[session]
user_id = 7
name = "Ada"
roles = ["analyst"]
"#,
        )
        .unwrap();
        let config = load_from(&path).unwrap();
        assert_eq!(config.api.base_url, "http://web-api:4000");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.cache, CacheSettings::default());
        let identity = config.session.unwrap();
        assert_eq!(identity.user_id, Some(7));
        assert_eq!(identity.roles, vec!["analyst".to_string()]);
    }

    #[test]
    fn malformed_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[api\nbase_url = 1").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn base_url_is_normalized() {
        assert_eq!(
            normalize_base_url("http://web-api:4000/").unwrap(),
            "http://web-api:4000"
        );
        assert!(matches!(
            normalize_base_url("ftp://example.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn load_or_default_reads_from_app_dir() {
        let base = tempdir().unwrap();
        let _guard = app_dirs::OverrideGuard::set(base.path().to_path_buf());
        let path = config_path().unwrap();
        std::fs::write(&path, "[cache]\nfeatures_ttl_secs = 5\n").unwrap();
        let config = load_or_default().unwrap();
        assert_eq!(config.cache.features_ttl_secs, 5);
    }
}
