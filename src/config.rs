//! Resolver configuration.
//!
//! The configuration is a plain serializable value; reading it from files or
//! the environment is up to the embedding application.
//!
//! ```
//! use icon_resolver::ResolverConfig;
//!
//! let config = ResolverConfig::from_json(r#"{ "nativeRendererUrl": "http://127.0.0.1:7070" }"#)
//!     .unwrap()
//!     .with_cache_capacity_bytes(1024 * 1024);
//!
//! assert_eq!(config.native_renderer_url.as_deref(), Some("http://127.0.0.1:7070"));
//! assert_eq!(config.request_timeout_secs, 30);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::DEFAULT_ICONIFY_BASE_URL;
use crate::error::Result;

/// Default cache capacity: 64 MiB of icon data.
pub const DEFAULT_CACHE_CAPACITY_BYTES: usize = 64 * 1024 * 1024;

/// Configuration for [`IconResolver`](crate::IconResolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    /// Upper bound on the total size of cached icon data.
    pub cache_capacity_bytes: usize,
    /// Base address of the native renderer helper; `None` disables it.
    pub native_renderer_url: Option<String>,
    /// Base address of the Iconify API.
    pub iconify_base_url: String,
    /// Timeout applied to every upstream request.
    pub request_timeout_secs: u64,
    /// `User-Agent` sent upstream.
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_capacity_bytes: DEFAULT_CACHE_CAPACITY_BYTES,
            native_renderer_url: None,
            iconify_base_url: DEFAULT_ICONIFY_BASE_URL.to_string(),
            request_timeout_secs: 30,
            user_agent: format!("icon-resolver/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ResolverConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_capacity_bytes(mut self, bytes: usize) -> Self {
        self.cache_capacity_bytes = bytes;
        self
    }

    pub fn with_native_renderer_url(mut self, url: impl Into<String>) -> Self {
        self.native_renderer_url = Some(url.into());
        self
    }

    pub fn with_iconify_base_url(mut self, url: impl Into<String>) -> Self {
        self.iconify_base_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Deserializes a configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the HTTP client shared by all backends.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(self.request_timeout())
            .user_agent(self.user_agent.clone())
            .build()?;
        Ok(client)
    }
}
