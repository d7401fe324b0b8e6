//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_STATE_DIR: &str = ".asotobase";

pub const ENV_API_URL: &str = "ASOTOBASE_API_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "ASOTOBASE_REQUEST_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "ASOTOBASE_CONNECT_TIMEOUT_SECS";
pub const ENV_STATE_DIR: &str = "ASOTOBASE_STATE_DIR";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root every request path is appended to, without a trailing `/`.
    pub base_url: String,
    /// Whole-request timeout. `None` leaves the HTTP client default.
    pub request_timeout: Option<Duration>,
    /// Connect timeout. `None` leaves the HTTP client default.
    pub connect_timeout: Option<Duration>,
    /// Directory holding the token cookie and the persisted session entry.
    pub state_dir: PathBuf,
}

impl ClientConfig {
    /// Config pointing at `base_url` with no timeouts and the default state directory.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            request_timeout: None,
            connect_timeout: None,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
        })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `ASOTOBASE_API_URL`: default `http://localhost:8000/api/v1`
    /// - `ASOTOBASE_REQUEST_TIMEOUT_SECS`: unset means no explicit timeout
    /// - `ASOTOBASE_CONNECT_TIMEOUT_SECS`: unset means no explicit timeout
    /// - `ASOTOBASE_STATE_DIR`: default `.asotobase`
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        let state_dir = std::env::var(ENV_STATE_DIR).unwrap_or_else(|_| DEFAULT_STATE_DIR.to_owned());

        Ok(Self {
            base_url: normalize_base_url(&raw_url)?,
            request_timeout: env_secs(ENV_REQUEST_TIMEOUT_SECS),
            connect_timeout: env_secs(ENV_CONNECT_TIMEOUT_SECS),
            state_dir: PathBuf::from(state_dir),
        })
    }

    /// Replace the base URL, normalized the same way as in [`ClientConfig::new`].
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_state_dir(mut self, state_dir: impl Into<PathBuf>) -> Self {
        self.state_dir = state_dir.into();
        self
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

pub(crate) fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match host {
        Some(rest) if !rest.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidBaseUrl(raw.to_owned())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
