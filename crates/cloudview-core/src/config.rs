//! Configuration for Cloudview
//!
//! Built once at process start and passed explicitly to the client and the
//! synchronizer. Request logic never reads the environment itself.

use crate::error::{CloudError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the API base URL
pub const ENV_API_URL: &str = "CLOUDVIEW_API_URL";

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "CLOUDVIEW_API_KEY";

/// Default poll interval in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Upstream API configuration
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API base URL, e.g. `https://api.digitalocean.com/v2`
    #[serde(default)]
    pub base_url: Option<String>,
    /// Bearer token
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ApiConfig {
    /// Create configuration with both values set
    #[inline]
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            api_key: Some(api_key.into()),
        }
    }

    /// Read configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: lookup(ENV_API_URL),
            api_key: lookup(ENV_API_KEY),
        }
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// With API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Overlay values present in `other`
    #[must_use]
    pub fn overlay(mut self, other: ApiConfig) -> Self {
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        self
    }

    /// Validated credentials for a request
    ///
    /// # Errors
    /// - `CloudError::Configuration` if the key or base URL is absent or blank
    pub fn credentials(&self) -> Result<Credentials<'_>> {
        let api_key = non_blank(self.api_key.as_deref())
            .ok_or_else(|| CloudError::configuration("API key is not defined"))?;
        let base_url = non_blank(self.base_url.as_deref())
            .ok_or_else(|| CloudError::configuration("API URL is not defined"))?;

        Ok(Credentials {
            base_url: base_url.trim_end_matches('/'),
            api_key,
        })
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Borrowed, validated request credentials
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    /// Base URL without trailing slash
    pub base_url: &'a str,
    /// Bearer token
    pub api_key: &'a str,
}

impl Credentials<'_> {
    /// URL for a path below the base
    #[inline]
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Selection between the live and the placeholder set of a poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Show placeholder records when the live set is empty
    #[default]
    DefaultsWhenEmpty,
    /// Always show the live set, even when empty
    LiveOnly,
}

/// Synchronizer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Seconds between poll cycles
    pub poll_interval_secs: u64,
    /// Live/placeholder selection
    pub fallback: FallbackPolicy,
}

impl SyncConfig {
    /// Poll interval as a duration (never zero)
    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// With poll interval
    #[inline]
    #[must_use]
    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// With fallback policy
    #[inline]
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            fallback: FallbackPolicy::default(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudviewConfig {
    /// Upstream API
    pub api: ApiConfig,
    /// Polling
    pub sync: SyncConfig,
}

impl CloudviewConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// - `CloudError::Configuration` on invalid TOML
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CloudError::configuration(format!("invalid config: {e}")))
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// - `CloudError::Configuration` if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CloudError::configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Override API values with those present in the environment
    #[must_use]
    pub fn merge_env(self) -> Self {
        self.merge_lookup(|key| std::env::var(key).ok())
    }

    /// Override API values through an arbitrary variable lookup
    #[must_use]
    pub fn merge_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.api = self.api.overlay(ApiConfig::from_lookup(lookup));
        self
    }

    /// With API configuration
    #[inline]
    #[must_use]
    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    /// With sync configuration
    #[inline]
    #[must_use]
    pub fn with_sync(mut self, sync: SyncConfig) -> Self {
        self.sync = sync;
        self
    }
}
