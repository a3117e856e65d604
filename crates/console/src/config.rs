//! Console configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use tallerpro_observability::LogFormat;

pub const API_URL_VAR: &str = "TALLERPRO_API_URL";
pub const DATA_DIR_VAR: &str = "TALLERPRO_DATA_DIR";
pub const REQUEST_TIMEOUT_VAR: &str = "TALLERPRO_REQUEST_TIMEOUT_SECS";
pub const LOG_FORMAT_VAR: &str = "TALLERPRO_LOG_FORMAT";

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
const DATABASE_FILE: &str = "console.db";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("no platform data directory; set TALLERPRO_DATA_DIR")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Base URL every resource client is rooted at.
    pub api_url: String,
    /// Directory holding `console.db`.
    pub data_dir: PathBuf,
    /// `None` leaves the HTTP client's default (no timeout).
    pub request_timeout: Option<Duration>,
    pub log_format: LogFormat,
}

impl ConsoleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset and blank values are the same.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = match get(API_URL_VAR) {
            Some(url) => {
                let url = url.trim().trim_end_matches('/').to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::Invalid {
                        var: API_URL_VAR,
                        value: url,
                        reason: "expected an http(s) URL",
                    });
                }
                url
            }
            None => DEFAULT_API_URL.to_string(),
        };

        let data_dir = match get(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|dir| dir.join("tallerpro"))
                .ok_or(ConfigError::NoDataDir)?,
        };

        let request_timeout = match get(REQUEST_TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: REQUEST_TIMEOUT_VAR,
                        value: raw,
                        reason: "expected a positive number of seconds",
                    });
                }
            },
            None => None,
        };

        let log_format = match get(LOG_FORMAT_VAR) {
            Some(raw) => LogFormat::parse(&raw).ok_or(ConfigError::Invalid {
                var: LOG_FORMAT_VAR,
                value: raw.clone(),
                reason: "expected `json` or `pretty`",
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            api_url,
            data_dir,
            request_timeout,
            log_format,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}
