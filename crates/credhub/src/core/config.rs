//! Client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::ConfigError;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const MIN_TIMEOUT: Duration = Duration::from_secs(1);
const MAX_TIMEOUT: Duration = Duration::from_secs(300);

/// Process-wide settings shared by every action
///
/// An empty `api_url` is representable: actions refuse to run against it with
/// [`CredHubError::NoApiTarget`](super::CredHubError::NoApiTarget) rather than
/// failing at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the CredHub server, e.g. `https://credhub.example.com:8844`
    pub api_url: String,
    /// Target environment identity, recorded on every request span
    pub environment: Option<String>,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Accept invalid TLS certificates
    pub skip_tls_validation: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            environment: None,
            timeout: DEFAULT_TIMEOUT,
            skip_tls_validation: false,
        }
    }
}

impl ClientConfig {
    /// Config targeting `api_url` with defaults elsewhere
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Whether an API target is configured
    pub fn has_api_target(&self) -> bool {
        !self.api_url.trim().is_empty()
    }

    /// Parsed API URL
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        if !self.has_api_target() {
            return Err(ConfigError::MissingRequired { field: "api_url" });
        }
        let url = Url::parse(self.api_url.trim()).map_err(|e| ConfigError::InvalidValue {
            field: "api_url",
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidValue {
                field: "api_url",
                reason: format!("scheme must be http or https, got '{other}'"),
            }),
        }
    }

    /// Check every field
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;
        if self.timeout < MIN_TIMEOUT || self.timeout > MAX_TIMEOUT {
            return Err(ConfigError::InvalidValue {
                field: "timeout",
                reason: format!(
                    "must be between {}s and {}s, got {:?}",
                    MIN_TIMEOUT.as_secs(),
                    MAX_TIMEOUT.as_secs(),
                    self.timeout
                ),
            });
        }
        Ok(())
    }
}
