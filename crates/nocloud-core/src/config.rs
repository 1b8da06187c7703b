//! Configuration module
//!
//! Client configuration: API key, control-plane base URL, retry policy and
//! request timeout. Immutable once the client is built.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::constants::DEFAULT_BASE_URL;
use crate::error::{NoCloudError, NoCloudResult};

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 1000;
const TIMEOUT_SECS: u64 = 60;

/// Fixed-delay retry policy for control-plane calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub retries: u32,
    /// Delay between attempts
    pub delay: Duration,
    /// Also retry on non-2xx responses, not only on network errors
    pub retry_on_status: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: MAX_RETRIES,
            delay: Duration::from_millis(RETRY_DELAY_MS),
            retry_on_status: true,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retry.
    pub fn none() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
            retry_on_status: false,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    pub retry: RetryPolicy,
    /// Per-attempt limit for control-plane calls; uploads to signed URLs are
    /// not bounded by it
    pub timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> NoCloudResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(NoCloudError::Config("API key must not be empty".to_string()));
        }

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(TIMEOUT_SECS),
        })
    }

    /// Build from environment: NOCLOUD_API_KEY (or API_KEY), NOCLOUD_API_URL
    /// (or API_URL), NOCLOUD_MAX_RETRIES, NOCLOUD_RETRY_DELAY_MS,
    /// NOCLOUD_RETRY_ON_STATUS, NOCLOUD_TIMEOUT_SECS.
    pub fn from_env() -> NoCloudResult<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("NOCLOUD_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .map_err(|_| {
                NoCloudError::Config("Missing API key. Set NOCLOUD_API_KEY or API_KEY".to_string())
            })?;

        let base_url = env::var("NOCLOUD_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let retry = RetryPolicy {
            retries: env::var("NOCLOUD_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_RETRIES),
            delay: Duration::from_millis(
                env::var("NOCLOUD_RETRY_DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(RETRY_DELAY_MS),
            ),
            retry_on_status: env::var("NOCLOUD_RETRY_ON_STATUS")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
        };

        let timeout = Duration::from_secs(
            env::var("NOCLOUD_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(TIMEOUT_SECS),
        );

        Ok(Self::new(api_key)?
            .with_base_url(base_url)
            .with_retry(retry)
            .with_timeout(timeout))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(ClientConfig::new(""), Err(NoCloudError::Config(_))));
        assert!(matches!(ClientConfig::new("   "), Err(NoCloudError::Config(_))));
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::new("key").unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.retry.max_attempts(), 4);
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn base_url_loses_trailing_slashes() {
        let config = ClientConfig::new("key")
            .unwrap()
            .with_base_url("http://localhost:8080//");
        assert_eq!(config.base_url(), "http://localhost:8080");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ClientConfig::new("super-secret").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn no_retry_policy() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.max_attempts(), 1);
        assert!(!policy.retry_on_status);
    }
}
