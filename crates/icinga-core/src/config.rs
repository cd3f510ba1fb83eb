//! Client configuration
//!
//! Settings can be given directly or loaded from a TOML file with an `[api]` table:
//!
//! ```toml
//! [api]
//! url = "https://icinga.example.com:5665"
//! username = "root"
//! password = "secret"
//! ca_certificate = "/etc/icinga2/pki/ca.crt"
//! timeout = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{ApiError, Result};

const SECTION: &str = "api";

/// Connection and credential settings for a [`Client`](crate::Client)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `https://localhost:5665`
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Client certificate (PEM). May also contain the private key.
    #[serde(default)]
    pub certificate: Option<PathBuf>,
    /// Private key for `certificate` when kept in a separate file
    #[serde(default)]
    pub key: Option<PathBuf>,
    /// CA used to verify the server. Without it, verification is disabled.
    #[serde(default)]
    pub ca_certificate: Option<PathBuf>,
    /// Request timeout in seconds; connect timeout for event streams
    #[serde(default)]
    pub timeout: Option<u64>,
    /// Longest gap between two event stream chunks, in seconds
    #[serde(default)]
    pub stream_idle_timeout: Option<u64>,
}

#[derive(Deserialize)]
struct ConfigFile {
    api: Option<ClientConfig>,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Default config file location (`<config dir>/icinga2api/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("icinga2api").join("config.toml"))
    }

    /// Load settings from the `[api]` table of a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ApiError::ConfigFile(format!(
                "Config file \"{}\" doesn't exist.",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ApiError::ConfigFile(format!(
                "No read access for config file \"{}\": {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::parse(&content)?;
        debug!("Loaded client config from {}", path.display());
        Ok(config)
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ApiError::ConfigFile(e.to_string()))?;

        let config = file.api.ok_or_else(|| {
            ApiError::ConfigFile(format!("Config file is missing \"{SECTION}\" section."))
        })?;

        Ok(config.trimmed())
    }

    /// Fill every unset field from `fallback`
    pub fn or(self, fallback: ClientConfig) -> Self {
        Self {
            url: self.url.or(fallback.url),
            username: self.username.or(fallback.username),
            password: self.password.or(fallback.password),
            certificate: self.certificate.or(fallback.certificate),
            key: self.key.or(fallback.key),
            ca_certificate: self.ca_certificate.or(fallback.ca_certificate),
            timeout: self.timeout.or(fallback.timeout),
            stream_idle_timeout: self.stream_idle_timeout.or(fallback.stream_idle_timeout),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    pub fn stream_idle_timeout(&self) -> Option<Duration> {
        self.stream_idle_timeout.map(Duration::from_secs)
    }

    fn trimmed(self) -> Self {
        let trim = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            url: trim(self.url),
            username: trim(self.username),
            password: trim(self.password),
            ..self
        }
    }
}
