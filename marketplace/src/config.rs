//! Client configuration loaded via OrthoConfig.
//!
//! Values layer defaults, an optional configuration file, and `MARKETPLACE_*`
//! environment variables. Scalar settings carry defaults; optional ones fall
//! back in their accessors.

use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::DashboardSettings;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_STORAGE_DIR: &str = ".marketplace";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The API base URL did not parse.
    #[error("invalid API base URL {value:?}: {message}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// The storage directory is not valid UTF-8.
    #[error("storage directory {path:?} is not valid UTF-8")]
    NonUtf8StorageDir {
        /// Configured path.
        path: PathBuf,
    },
}

/// Settings for the dashboard client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARKETPLACE")]
pub struct ClientSettings {
    /// Root URL of the REST backend.
    pub api_base_url: Option<String>,
    /// Bearer token sent with every request.
    pub api_token: Option<String>,
    /// Per-request HTTP timeout in milliseconds.
    #[ortho_config(default = 10000)]
    pub request_timeout_ms: u64,
    /// Upper bound on each dashboard source in milliseconds; zero disables it.
    pub source_timeout_ms: Option<u64>,
    /// Recent listings shown on the student dashboard.
    #[ortho_config(default = 5)]
    pub recent_jobs_limit: u32,
    /// Page size for paginated sources.
    #[ortho_config(default = 20)]
    pub page_size: u32,
    /// Unread badge polling interval in seconds.
    #[ortho_config(default = 30)]
    pub unread_poll_secs: u64,
    /// Directory holding saved selections.
    pub storage_dir: Option<PathBuf>,
}

impl ClientSettings {
    /// Parsed API base URL, falling back to the local default.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBaseUrl`] when the configured value does not
    /// parse.
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        let value = self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL);
        Url::parse(value).map_err(|err| ConfigError::InvalidBaseUrl {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    /// Configured bearer token, ignoring blank values.
    pub fn api_token(&self) -> Option<String> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Per-source timeout; `None` when unset or zero.
    pub fn source_timeout(&self) -> Option<Duration> {
        self.source_timeout_ms
            .filter(|millis| *millis > 0)
            .map(Duration::from_millis)
    }

    /// Unread polling interval, at least one second.
    pub fn unread_poll_interval(&self) -> Duration {
        Duration::from_secs(self.unread_poll_secs.max(1))
    }

    /// Directory holding saved selections.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NonUtf8StorageDir`] for paths that are not UTF-8.
    pub fn storage_dir(&self) -> Result<Utf8PathBuf, ConfigError> {
        let path = self
            .storage_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));
        Utf8PathBuf::from_path_buf(path).map_err(|path| ConfigError::NonUtf8StorageDir { path })
    }

    /// Dashboard sizing and timing derived from these settings.
    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            recent_jobs_limit: self.recent_jobs_limit.max(1),
            page_size: self.page_size.max(1),
            source_timeout: self.source_timeout(),
        }
    }
}
