//! Centralized configuration for the arcadectl ecosystem.
//!
//! Lives at `~/.arcadectl/config.toml`. The endpoint and the per-deployment
//! service credential come from here; the per-user bearer token does not
//! (see [`crate::token::TokenStore`]).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ArcadeError, Result};

/// Default request timeout when the config does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcadeConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the catalog backend, e.g. `https://api.example.com`
    pub endpoint: String,
    /// Static per-deployment secret, sent as `X-Auth-Token` on every request
    pub service_token: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Default sort for `comments list` (newest|oldest)
    pub default_sort: Option<String>,
    pub quiet: Option<bool>,
}

impl ArcadeConfig {
    /// Load config from `~/.arcadectl/config.toml`.
    ///
    /// Fails hard with an actionable error if the config doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ArcadeError::config(format!(
                "config not found at {path:?}\n\nCreate it with an [api] section:\n\
                 endpoint = \"https://api.example.com\"\n\
                 service_token = \"...\""
            )));
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|err| ArcadeError::config(format!("invalid TOML in {path:?}: {err}")))?;

        if config.api.endpoint.trim().is_empty() {
            return Err(ArcadeError::config("api.endpoint is empty"));
        }

        Ok(config)
    }

    /// Get config file path: `~/.arcadectl/config.toml`
    pub fn config_path() -> PathBuf {
        Self::home_dir().join(".arcadectl/config.toml")
    }

    /// Default bearer token path: `~/.arcadectl/token`
    pub fn default_token_path() -> PathBuf {
        Self::home_dir().join(".arcadectl/token")
    }

    fn home_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Endpoint with any trailing slash removed, for path joining.
    pub fn endpoint(&self) -> &str {
        self.api.endpoint.trim_end_matches('/')
    }

    pub fn timeout_secs(&self) -> u64 {
        self.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[api]\nendpoint = \"https://api.example.com/\"\nservice_token = \"s3cret\"\ntimeout_secs = 10"
        )
        .unwrap();

        let config = ArcadeConfig::load_from(&path).unwrap();
        assert_eq!(config.endpoint(), "https://api.example.com");
        assert_eq!(config.api.service_token, "s3cret");
        assert_eq!(config.timeout_secs(), 10);
    }

    #[test]
    fn test_missing_config_is_actionable() {
        let err = ArcadeConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(err.to_string().contains("config not found"));
    }

    #[test]
    fn test_timeout_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[api]\nendpoint = \"http://localhost:4000\"\nservice_token = \"x\"\n",
        )
        .unwrap();

        let config = ArcadeConfig::load_from(&path).unwrap();
        assert_eq!(config.timeout_secs(), DEFAULT_TIMEOUT_SECS);
    }
}
