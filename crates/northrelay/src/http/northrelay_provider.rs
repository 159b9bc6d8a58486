//! reqwest-backed provider for the NorthRelay API

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, header};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ApiRequest, HttpProvider, Response, TransportError, TransportFailure};
use crate::error::{Error, Result};

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP provider for the NorthRelay REST API.
///
/// Every request carries `Authorization: Bearer <key>`, a JSON content type,
/// and a `northrelay-rust/<version>` user agent. The timeout applies to each
/// attempt separately.
///
/// # Example
///
/// ```rust,no_run
/// use northrelay::http::NorthRelayHttpProvider;
/// use std::sync::Arc;
///
/// let provider = Arc::new(NorthRelayHttpProvider::builder()
///     .api_key("nr_live_...")
///     .build()
///     .unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct NorthRelayHttpProvider {
    inner: Arc<ProviderInner>,
}

#[derive(Debug)]
struct ProviderInner {
    http_client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl NorthRelayHttpProvider {
    /// Create a new builder for configuring the provider.
    pub fn builder() -> NorthRelayHttpProviderBuilder {
        NorthRelayHttpProviderBuilder::default()
    }

    /// Per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    fn endpoint(&self, request: &ApiRequest) -> std::result::Result<Url, TransportError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = request.path();
        let separator = if path.starts_with('/') { "" } else { "/" };

        let mut url = Url::parse(&format!("{base}{separator}{path}")).map_err(|e| {
            TransportError::new(
                TransportFailure::Other,
                format!("Failed to construct URL from path '{path}': {e}"),
            )
        })?;

        if !request.query_pairs().is_empty() {
            url.query_pairs_mut().extend_pairs(request.query_pairs());
        }

        Ok(url)
    }
}

#[async_trait]
impl HttpProvider for NorthRelayHttpProvider {
    async fn send(&self, request: &ApiRequest) -> std::result::Result<Response, TransportError> {
        let url = self.endpoint(request)?;

        let mut builder = self
            .inner
            .http_client
            .request(request.method().clone(), url);
        if let Some(body) = request.body() {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from(e).with_response_headers(headers.clone()))?;

        Ok(Response::new(status, headers, body))
    }

    fn provider_name(&self) -> &'static str {
        "northrelay"
    }

    fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }
}

/// Builder for creating a `NorthRelayHttpProvider` with custom configuration.
///
/// # Example
///
/// ```rust,no_run
/// use northrelay::http::NorthRelayHttpProvider;
///
/// let provider = NorthRelayHttpProvider::builder()
///     .api_key("nr_test_...")
///     .base_url("https://staging.northrelay.ca")
///     .timeout(std::time::Duration::from_secs(10))
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct NorthRelayHttpProviderBuilder {
    api_key: Option<SecretString>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    default_headers: HeaderMap,
}

impl NorthRelayHttpProviderBuilder {
    /// Set the API key sent as a bearer token.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the API key from an existing secret.
    pub fn api_key_secret(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set the base URL for the API.
    ///
    /// Defaults to `https://app.northrelay.ca`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the per-attempt timeout.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a custom header to include with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key = key_str
            .parse::<HeaderName>()
            .map_err(|_| Error::InvalidHeaderName(key_str.clone()))?;
        let value = value_str
            .parse::<HeaderValue>()
            .map_err(|_| Error::InvalidHeaderValue(value_str.clone()))?;

        self.default_headers.insert(key, value);
        Ok(self)
    }

    /// Merge a set of pre-validated headers.
    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        for (key, value) in headers {
            self.default_headers.insert(key.clone(), value.clone());
        }
        self
    }

    /// Build the provider with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No API key is provided
    /// - The base URL is empty, unparseable, or not http(s)
    /// - HTTP client creation fails
    pub fn build(self) -> Result<NorthRelayHttpProvider> {
        let Self {
            api_key,
            base_url,
            timeout,
            default_headers,
        } = self;

        let api_key = api_key
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or_else(|| Error::MissingConfig("API key is required".to_string()))?;
        let base_url = parse_base_url(base_url.as_deref().unwrap_or(crate::DEFAULT_BASE_URL))?;
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|_| Error::InvalidHeaderValue("authorization".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        for (key, value) in &default_headers {
            headers.insert(key.clone(), value.clone());
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("northrelay-rust/{}", crate::VERSION))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(NorthRelayHttpProvider {
            inner: Arc::new(ProviderInner {
                http_client,
                base_url,
                timeout,
            }),
        })
    }
}

/// Validate a base URL: non-empty, parseable, http or https.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    if raw.trim().is_empty() {
        return Err(Error::InvalidUrl("Base URL cannot be empty".to_string()));
    }

    let url: Url = raw
        .trim()
        .parse()
        .map_err(|e| Error::InvalidUrl(format!("{e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::InvalidUrl(format!(
            "Invalid URL scheme '{scheme}'. Only 'http' and 'https' are supported."
        ))),
    }
}
