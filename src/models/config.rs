//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Record normalization settings
    #[serde(default)]
    pub normalize: NormalizeConfig,

    /// Guided finder and leaderboard settings
    #[serde(default)]
    pub finder: FinderConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::validation("api.base_url is empty"));
        }
        url::Url::parse(&self.api.base_url)
            .map_err(|e| AppError::validation(format!("api.base_url is invalid: {e}")))?;
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.finder.leaderboard_size == 0 {
            return Err(AppError::validation("finder.leaderboard_size must be > 0"));
        }
        if self.normalize.placeholder_image.trim().is_empty() {
            return Err(AppError::validation("normalize.placeholder_image is empty"));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server origin; requests go to `{base_url}/api/...`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

impl ApiConfig {
    /// Root of the API with the trailing slash normalized, e.g. `http://host/api/`.
    pub fn api_root(&self) -> Result<url::Url> {
        let origin = self.base_url.trim().trim_end_matches('/');
        Ok(url::Url::parse(&format!("{origin}/api/"))?)
    }
}

/// What to store when a record has no creation timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTimestamp {
    /// Leave the timestamp unknown
    #[default]
    Unknown,
    /// Stamp the record with the normalization time
    Now,
}

/// Record normalization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeConfig {
    #[serde(default)]
    pub missing_timestamp: MissingTimestamp,

    /// Image shown for instructors without a profile image
    #[serde(default = "defaults::placeholder_image")]
    pub placeholder_image: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            missing_timestamp: MissingTimestamp::default(),
            placeholder_image: defaults::placeholder_image(),
        }
    }
}

/// Guided finder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Reject deep links whose subject is not offered for the exam type
    #[serde(default = "defaults::strict_deep_links")]
    pub strict_deep_links: bool,

    /// Number of instructors shown on the leaderboard
    #[serde(default = "defaults::leaderboard_size")]
    pub leaderboard_size: usize,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            strict_deep_links: defaults::strict_deep_links(),
            leaderboard_size: defaults::leaderboard_size(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use crate::models::PLACEHOLDER_IMAGE;

    pub fn base_url() -> String {
        "http://localhost:3001".into()
    }

    pub fn timeout() -> u64 {
        10
    }

    pub fn user_agent() -> String {
        concat!("testnav/", env!("CARGO_PKG_VERSION")).into()
    }

    pub fn placeholder_image() -> String {
        PLACEHOLDER_IMAGE.into()
    }

    pub fn strict_deep_links() -> bool {
        true
    }

    pub fn leaderboard_size() -> usize {
        3
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.finder.leaderboard_size, 3);
        assert_eq!(config.normalize.missing_timestamp, MissingTimestamp::Unknown);
    }

    #[test]
    fn test_api_root_strips_trailing_slash() {
        let api = ApiConfig {
            base_url: "https://testnav.example.com/".into(),
            ..ApiConfig::default()
        };
        let root = api.api_root().unwrap();
        assert_eq!(root.as_str(), "https://testnav.example.com/api/");
        assert_eq!(
            root.join("instructors/top3").unwrap().as_str(),
            "https://testnav.example.com/api/instructors/top3"
        );
    }

    #[test]
    fn test_load_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"https://api.testnav.kr\"\n\n[normalize]\nmissing_timestamp = \"now\"\n\n[finder]\nstrict_deep_links = false"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.base_url, "https://api.testnav.kr");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.normalize.missing_timestamp, MissingTimestamp::Now);
        assert!(!config.finder.strict_deep_links);
        assert_eq!(config.finder.leaderboard_size, 3);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = Config::load_or_default("/nonexistent/testnav.toml");
        assert_eq!(config.api.base_url, "http://localhost:3001");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.base_url = "not a url".into();
        assert!(config.validate().is_err());
    }
}
