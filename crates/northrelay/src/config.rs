//! Configuration for the NorthRelay client

use http::HeaderMap;
use northrelay_core::RetryPolicy;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::error::{Error, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_RETRY_DELAY: Duration = Duration::from_secs(10);
const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Prefix of production API keys.
pub const LIVE_KEY_PREFIX: &str = "nr_live_";
/// Prefix of sandbox API keys.
pub const TEST_KEY_PREFIX: &str = "nr_test_";

/// Which environment an API key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiKeyMode {
    /// `nr_live_` key: sends real email
    Live,
    /// `nr_test_` key: sandbox, nothing is delivered
    Test,
}

impl ApiKeyMode {
    /// Validate the format of `api_key` and report its mode.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingConfig`] if the key is empty
    /// - [`Error::InvalidApiKey`] if it lacks a `nr_live_` or `nr_test_` prefix
    pub fn from_key(api_key: &str) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(Error::MissingConfig("API key is required".to_string()));
        }

        if api_key.starts_with(LIVE_KEY_PREFIX) {
            Ok(ApiKeyMode::Live)
        } else if api_key.starts_with(TEST_KEY_PREFIX) {
            Ok(ApiKeyMode::Test)
        } else {
            Err(Error::InvalidApiKey(format!(
                "API key must start with '{LIVE_KEY_PREFIX}' or '{TEST_KEY_PREFIX}'"
            )))
        }
    }
}

/// Configuration for the NorthRelay client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key for bearer authentication
    pub api_key: Option<SecretString>,

    /// Base URL for the API, `https://app.northrelay.ca` when unset
    pub base_url: Option<String>,

    /// Timeout for each individual HTTP attempt
    pub timeout: Duration,

    /// Maximum number of attempts per call, the first one included
    pub max_retries: u32,

    /// Delay before the first retry
    pub retry_delay: Duration,

    /// Cap on any single retry delay
    pub max_retry_delay: Duration,

    /// Growth factor of the retry delay
    pub backoff_multiplier: f64,

    /// Let a `retry-after` header lengthen the retry delay (up to the cap)
    pub honor_retry_after: bool,

    /// Custom headers to include with every request
    pub default_headers: HeaderMap,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            max_retry_delay: DEFAULT_MAX_RETRY_DELAY,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            honor_retry_after: false,
            default_headers: HeaderMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with an API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::new(api_key.into().into_boxed_str())),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first, if present.
    /// Variables:
    /// - `NORTHRELAY_API_KEY`
    /// - `NORTHRELAY_BASE_URL`
    /// - `NORTHRELAY_TIMEOUT` (seconds)
    /// - `NORTHRELAY_MAX_RETRIES`
    ///
    /// Unparseable numbers are ignored and the default kept.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        use std::env;

        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(api_key) = env::var("NORTHRELAY_API_KEY") {
            config.api_key = Some(SecretString::new(api_key.into_boxed_str()));
        }

        if let Ok(base_url) = env::var("NORTHRELAY_BASE_URL") {
            config.base_url = Some(base_url);
        }

        if let Ok(timeout_str) = env::var("NORTHRELAY_TIMEOUT")
            && let Ok(timeout_secs) = timeout_str.trim().parse::<u64>()
        {
            config.timeout = Duration::from_secs(timeout_secs);
        }

        if let Ok(max_retries_str) = env::var("NORTHRELAY_MAX_RETRIES")
            && let Ok(max_retries) = max_retries_str.trim().parse::<u32>()
        {
            config.max_retries = max_retries;
        }

        Ok(config)
    }

    /// Merge this configuration with another, with the other taking precedence.
    ///
    /// Fields of `other` still at their default value do not override.
    pub fn merge(mut self, other: ClientConfig) -> Self {
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.timeout != DEFAULT_TIMEOUT {
            self.timeout = other.timeout;
        }
        if other.max_retries != DEFAULT_MAX_RETRIES {
            self.max_retries = other.max_retries;
        }
        if other.retry_delay != DEFAULT_RETRY_DELAY {
            self.retry_delay = other.retry_delay;
        }
        if other.max_retry_delay != DEFAULT_MAX_RETRY_DELAY {
            self.max_retry_delay = other.max_retry_delay;
        }
        if other.backoff_multiplier != DEFAULT_BACKOFF_MULTIPLIER {
            self.backoff_multiplier = other.backoff_multiplier;
        }
        if other.honor_retry_after {
            self.honor_retry_after = true;
        }
        for (key, value) in other.default_headers.iter() {
            self.default_headers.insert(key.clone(), value.clone());
        }

        self
    }

    /// Mode of the configured API key.
    ///
    /// # Errors
    ///
    /// Fails like [`ApiKeyMode::from_key`]; a missing key is
    /// [`Error::MissingConfig`].
    pub fn api_key_mode(&self) -> Result<ApiKeyMode> {
        let key = self
            .api_key
            .as_ref()
            .ok_or_else(|| Error::MissingConfig("API key is required".to_string()))?;
        ApiKeyMode::from_key(key.expose_secret())
    }

    /// Retry policy described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRetryPolicy`] if the multiplier is below 1.0 or
    /// the initial delay exceeds the cap.
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        Ok(RetryPolicy::builder()
            .max_attempts(self.max_retries)
            .initial_delay(self.retry_delay)
            .max_delay(self.max_retry_delay)
            .multiplier(self.backoff_multiplier)
            .honor_retry_after(self.honor_retry_after)
            .build()?)
    }
}

/// Builder for creating ClientConfig with a fluent API.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the maximum number of attempts.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Set the delay before the first retry.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    /// Set the cap on retry delays.
    pub fn max_retry_delay(mut self, delay: Duration) -> Self {
        self.config.max_retry_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.config.backoff_multiplier = multiplier;
        self
    }

    /// Honor `retry-after` when scheduling retries.
    pub fn honor_retry_after(mut self, honor: bool) -> Self {
        self.config.honor_retry_after = honor;
        self
    }

    /// Add a default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| Error::InvalidHeaderName(key_str.clone()))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| Error::InvalidHeaderValue(value_str.clone()))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
