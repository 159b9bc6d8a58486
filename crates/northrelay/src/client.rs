//! Main client implementation for the NorthRelay API

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use northrelay_core::{CancellationToken, RetryPolicy, execute_with_retry};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::{
    config::{ApiKeyMode, ClientConfig},
    error::{Error, Result, TransportOutcome, classify},
    http::{ApiRequest, HttpProvider, NorthRelayHttpProvider, Response},
    observability::{RequestMetadata, RequestTimer, ResponseMetadata},
    rate_limit::{RateLimitSnapshot, RateLimitTracker},
    resources::{
        Analytics, ApiKeys, BrandThemes, Campaigns, Contacts, Domains, Emails, Events, Metrics,
        Templates, Webhooks,
    },
};

/// Main client for interacting with the NorthRelay API.
///
/// Every call goes through one pipeline: send, record rate-limit headers,
/// classify failures, retry transient ones under the client's
/// [`RetryPolicy`]. Cloning is cheap and clones share the rate-limit tracker.
///
/// # Example
///
/// ```rust,no_run
/// use northrelay::Client;
///
/// # fn example() -> northrelay::Result<()> {
/// let client = Client::new("nr_live_...")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    provider: Arc<dyn HttpProvider>,
    policy: RetryPolicy,
    tracker: Arc<RateLimitTracker>,
    cancel: CancellationToken,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("provider", &self.inner.provider.provider_name())
            .field("base_url", &self.inner.provider.base_url())
            .field("policy", &self.inner.policy)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client with an API key and default settings.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingConfig`] if the key is empty
    /// - [`Error::InvalidApiKey`] if it is not a `nr_live_` or `nr_test_` key
    /// - [`Error::HttpClient`] if the HTTP client cannot be initialized
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a client from `NORTHRELAY_*` environment variables.
    ///
    /// # Errors
    ///
    /// Same as [`Client::from_config`].
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client over a custom transport with the default retry policy.
    ///
    /// The provider is responsible for authentication.
    pub fn from_provider(provider: Arc<dyn HttpProvider>) -> Self {
        Self::from_provider_with_policy(provider, RetryPolicy::default())
    }

    /// Create a client over a custom transport and retry policy.
    pub fn from_provider_with_policy(provider: Arc<dyn HttpProvider>, policy: RetryPolicy) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                provider,
                policy,
                tracker: Arc::new(RateLimitTracker::new()),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Create a client from a configuration object.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or malformed, the base URL
    /// is invalid, or the retry settings are inconsistent.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::MissingConfig("API key is required".to_string()))?;
        let mode = ApiKeyMode::from_key(api_key.expose_secret())?;
        let policy = config.retry_policy()?;

        let mut provider_builder = NorthRelayHttpProvider::builder()
            .api_key_secret(api_key)
            .timeout(config.timeout)
            .headers(&config.default_headers);
        if let Some(base_url) = config.base_url {
            provider_builder = provider_builder.base_url(base_url);
        }
        let provider = Arc::new(provider_builder.build()?);

        tracing::debug!(
            base_url = %provider.base_url(),
            ?mode,
            max_attempts = policy.max_attempts(),
            "NorthRelay client created"
        );

        Ok(Self::from_provider_with_policy(provider, policy))
    }

    /// A handle whose calls stop when `token` is cancelled.
    ///
    /// Cancellation interrupts both in-flight requests and backoff sleeps and
    /// surfaces as [`Error::Cancelled`]. The handle shares this client's
    /// transport and rate-limit tracker.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                provider: Arc::clone(&self.inner.provider),
                policy: self.inner.policy.clone(),
                tracker: Arc::clone(&self.inner.tracker),
                cancel: token,
            }),
        }
    }

    /// Rate-limit state from the most recent response that reported it.
    pub fn rate_limit_info(&self) -> Option<RateLimitSnapshot> {
        self.inner.tracker.current()
    }

    /// Retry policy applied to every call.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.inner.policy
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.inner.provider.base_url()
    }

    /// Sending, scheduling, and validating emails.
    pub fn emails(&self) -> Emails<'_> {
        Emails::new(self)
    }

    /// Email templates.
    pub fn templates(&self) -> Templates<'_> {
        Templates::new(self)
    }

    /// Sending domains.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self)
    }

    /// Webhook endpoint management.
    pub fn webhooks(&self) -> Webhooks<'_> {
        Webhooks::new(self)
    }

    /// Delivery events.
    pub fn events(&self) -> Events<'_> {
        Events::new(self)
    }

    /// Contacts and contact lists.
    pub fn contacts(&self) -> Contacts<'_> {
        Contacts::new(self)
    }

    /// Campaigns.
    pub fn campaigns(&self) -> Campaigns<'_> {
        Campaigns::new(self)
    }

    /// Reporting and exports.
    pub fn analytics(&self) -> Analytics<'_> {
        Analytics::new(self)
    }

    /// Delivery metrics.
    pub fn metrics(&self) -> Metrics<'_> {
        Metrics::new(self)
    }

    /// API key management.
    pub fn api_keys(&self) -> ApiKeys<'_> {
        ApiKeys::new(self)
    }

    /// Email brand themes.
    pub fn brand_themes(&self) -> BrandThemes<'_> {
        BrandThemes::new(self)
    }

    /// Run `request` through the pipeline and decode the JSON body.
    pub(crate) async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.send(request).await?.parse_result()
    }

    /// Run `request` through the pipeline, ignoring the body.
    pub(crate) async fn execute_unit(&self, request: ApiRequest) -> Result<()> {
        self.send(request).await.map(drop)
    }

    async fn send(&self, request: ApiRequest) -> Result<Response> {
        let metadata = RequestMetadata::from_request(&request);
        let timer = RequestTimer::start();
        let last_attempt = AtomicU32::new(0);

        let result = {
            let request = &request;
            let metadata = &metadata;
            let last_attempt = &last_attempt;
            execute_with_retry(&self.inner.policy, &self.inner.cancel, move |attempt| {
                last_attempt.store(attempt, Ordering::Relaxed);
                self.attempt(request, metadata, attempt)
            })
            .await
        };

        let retries = last_attempt.load(Ordering::Relaxed);
        match &result {
            Ok(response) => ResponseMetadata::new(Some(response.status().as_u16()), timer.elapsed())
                .with_body_size(response.body().len())
                .with_retries(retries)
                .log_success(&metadata),
            Err(error) => ResponseMetadata::new(error.status(), timer.elapsed())
                .with_retries(retries)
                .log_error(&metadata, error_code(error), &error.to_string()),
        }

        result
    }

    async fn attempt(
        &self,
        request: &ApiRequest,
        metadata: &RequestMetadata,
        attempt: u32,
    ) -> Result<Response> {
        metadata.log_attempt(attempt);

        match self.inner.provider.send(request).await {
            Ok(response) => {
                self.inner.tracker.observe(response.headers());
                if response.is_success() {
                    Ok(response)
                } else {
                    Err(classify(&TransportOutcome::Response(&response)).into())
                }
            }
            Err(failure) => {
                if let Some(headers) = failure.response_headers() {
                    self.inner.tracker.observe(headers);
                }
                Err(classify(&TransportOutcome::Failure(&failure)).into())
            }
        }
    }
}

fn error_code(error: &Error) -> &'static str {
    match error {
        Error::Api(api) => api.code(),
        Error::Cancelled => "cancelled",
        _ => "client_error",
    }
}

/// Builder for creating a configured Client.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Set the API key for authentication.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the base URL for the API.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the timeout for each HTTP attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the maximum number of attempts per call.
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

    /// Add a custom default header.
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

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::http::{StatusCode, TransportError, TransportFailure};
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use http::HeaderMap;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted outcomes and counts calls.
    #[derive(Debug)]
    struct ScriptedProvider {
        outcomes: Mutex<VecDeque<std::result::Result<Response, TransportError>>>,
        calls: AtomicU32,
    }

    impl ScriptedProvider {
        fn new(outcomes: Vec<std::result::Result<Response, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpProvider for ScriptedProvider {
        async fn send(&self, _request: &ApiRequest) -> std::result::Result<Response, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::new(TransportFailure::Other, "script exhausted")))
        }

        fn provider_name(&self) -> &'static str {
            "scripted"
        }

        fn base_url(&self) -> &str {
            "http://scripted.test/"
        }
    }

    fn response(status: u16, body: &str) -> std::result::Result<Response, TransportError> {
        Ok(Response::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            body.to_string(),
        ))
    }

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::builder()
            .max_attempts(attempts)
            .initial_delay(Duration::from_millis(1))
            .max_delay(Duration::from_millis(5))
            .jitter(0.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_builder() {
        let client = Client::builder()
            .api_key("nr_test_key")
            .base_url("https://example.com")
            .timeout(Duration::from_secs(5))
            .max_retries(4)
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://example.com/");
        assert_eq!(client.retry_policy().max_attempts(), 4);
    }

    #[test]
    fn test_client_rejects_bad_keys() {
        assert_matches!(Client::new(""), Err(Error::MissingConfig(_)));
        assert_matches!(Client::new("sk_live_123"), Err(Error::InvalidApiKey(_)));
        assert_matches!(Client::builder().build(), Err(Error::MissingConfig(_)));
    }

    #[test]
    fn test_client_from_config_invalid_scheme() {
        let config = ClientConfig {
            api_key: Some(SecretString::new("nr_test_key".into())),
            base_url: Some("ftp://invalid.example.com".to_string()),
            ..Default::default()
        };

        match Client::from_config(config) {
            Err(Error::InvalidUrl(msg)) => assert!(msg.contains("ftp")),
            other => panic!("Expected InvalidUrl error, got {other:?}"),
        }
    }

    #[test]
    fn test_client_from_config_invalid_retry_settings() {
        let result = Client::builder()
            .api_key("nr_test_key")
            .backoff_multiplier(0.0)
            .build();
        assert_matches!(result, Err(Error::InvalidRetryPolicy(_)));
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let provider = ScriptedProvider::new(vec![
            response(503, ""),
            Err(TransportError::new(TransportFailure::ConnectionReset, "reset")),
            response(200, r#"{"valid":true}"#),
        ]);
        let client = Client::from_provider_with_policy(provider.clone(), fast_policy(3));

        let body: serde_json::Value = client
            .execute(ApiRequest::post("/api/v1/emails/validate"))
            .await
            .unwrap();

        assert_eq!(body["valid"], true);
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_terminal_failure_is_not_retried() {
        let provider = ScriptedProvider::new(vec![response(
            400,
            r#"{"error":{"code":"VALIDATION_ERROR","message":"bad from"}}"#,
        )]);
        let client = Client::from_provider_with_policy(provider.clone(), fast_policy(5));

        let err = client
            .execute_unit(ApiRequest::post("/api/v1/emails/send"))
            .await
            .unwrap_err();

        assert_matches!(err.kind(), Some(ErrorKind::Validation { .. }));
        assert_eq!(err.status(), Some(400));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_surfaces_last_error() {
        let provider = ScriptedProvider::new(vec![
            response(500, ""),
            response(502, ""),
            response(503, ""),
        ]);
        let client = Client::from_provider_with_policy(provider.clone(), fast_policy(3));

        let err = client
            .execute_unit(ApiRequest::get("/api/v1/domains"))
            .await
            .unwrap_err();

        assert_matches!(err.kind(), Some(ErrorKind::ServerError));
        assert_eq!(err.status(), Some(503));
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_handle_does_not_send() {
        let provider = ScriptedProvider::new(vec![response(200, "{}")]);
        let client = Client::from_provider_with_policy(provider.clone(), fast_policy(3));

        let token = CancellationToken::new();
        token.cancel();
        let cancelled = client.with_cancellation(token);

        let err = cancelled
            .execute_unit(ApiRequest::get("/api/v1/domains"))
            .await
            .unwrap_err();
        assert_matches!(err, Error::Cancelled);
        assert_eq!(provider.calls(), 0);

        // the original client is unaffected
        client
            .execute_unit(ApiRequest::get("/api/v1/domains"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancellation_handle_shares_rate_limit_tracker() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-limit", "100".parse().unwrap());
        headers.insert("x-ratelimit-remaining", "99".parse().unwrap());
        headers.insert("x-ratelimit-reset", "1700000000".parse().unwrap());
        let provider = ScriptedProvider::new(vec![Ok(Response::new(StatusCode::OK, headers, "{}"))]);

        let client = Client::from_provider(provider);
        let handle = client.with_cancellation(CancellationToken::new());
        assert!(client.rate_limit_info().is_none());

        handle
            .execute_unit(ApiRequest::get("/api/v1/domains"))
            .await
            .unwrap();

        assert_eq!(client.rate_limit_info().map(|s| s.remaining), Some(99));
    }

    #[tokio::test]
    async fn test_headers_observed_when_body_read_fails() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-limit", "100".parse().unwrap());
        headers.insert("x-ratelimit-remaining", "3".parse().unwrap());
        headers.insert("x-ratelimit-reset", "1700000000".parse().unwrap());
        let provider = ScriptedProvider::new(vec![Err(TransportError::new(
            TransportFailure::Other,
            "error decoding response body",
        )
        .with_response_headers(headers))]);
        let client = Client::from_provider_with_policy(provider.clone(), fast_policy(3));

        let err = client
            .execute_unit(ApiRequest::get("/api/v1/domains"))
            .await
            .unwrap_err();

        assert_matches!(err.kind(), Some(ErrorKind::Network { .. }));
        assert_eq!(provider.calls(), 1);
        assert_eq!(client.rate_limit_info().map(|s| s.remaining), Some(3));
    }

    #[test]
    fn test_client_debug_hides_key() {
        let client = Client::new("nr_test_supersecret").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("northrelay"));
    }
}
