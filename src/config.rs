use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::api::ApiConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("VIDEO_DL_API_URL is not a valid URL ({value}): {source}")]
    InvalidApiUrl {
        value: String,
        source: url::ParseError,
    },

    #[error("VIDEO_DL_API_URL must be an http(s) URL, got {0}")]
    UnsupportedScheme(String),
}

/// Application settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    /// Save straight into this directory instead of asking with a dialog.
    pub save_dir: Option<PathBuf>,
    /// Where response bodies are staged before being saved.
    pub staging_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            save_dir: None,
            staging_dir: std::env::temp_dir(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default = Self::default();
        let secs = |key: &str, fallback: Duration| {
            var(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|&s| s > 0)
                .map(Duration::from_secs)
                .unwrap_or(fallback)
        };

        let base_url = match var("VIDEO_DL_API_URL") {
            Some(value) => validate_base_url(value)?,
            None => default.api.base_url,
        };

        Ok(Self {
            api: ApiConfig {
                base_url,
                user_agent: var("VIDEO_DL_USER_AGENT").unwrap_or(default.api.user_agent),
                connect_timeout: secs("VIDEO_DL_CONNECT_TIMEOUT_SECS", default.api.connect_timeout),
                title_timeout: secs("VIDEO_DL_TITLE_TIMEOUT_SECS", default.api.title_timeout),
            },
            save_dir: var("VIDEO_DL_SAVE_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            staging_dir: var("VIDEO_DL_STAGING_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(default.staging_dir),
        })
    }
}

fn validate_base_url(value: String) -> Result<String, ConfigError> {
    let parsed = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidApiUrl {
        value: value.clone(),
        source,
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(value));
    }

    Ok(value.trim().trim_end_matches('/').to_string())
}
