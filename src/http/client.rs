//! Maps web service client
//!
//! Every endpoint call goes through the same steps:
//! - wait for a rate limiter permit (aborts on cancellation)
//! - build the request: query string + `key` for GET, JSON body +
//!   `X-Goog-Api-Key` header for POST
//! - dispatch through the retrying transport
//! - reject any status other than 200, then decode the JSON body

use super::rate_limit::{RateLimiter, DEFAULT_REQUESTS_PER_SECOND};
use super::request::{Endpoint, HeaderProducing, NoHeaders, QueryEncodable};
use super::retry::{RetryPolicy, RetryTransport};
use super::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::error::{Error, Result};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Query parameter carrying the credential on GET calls
pub const API_KEY_PARAM: &str = "key";
/// Header carrying the credential on POST calls
pub const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const API_KEY_HEADER_NAME: &str = "x-goog-api-key";

/// Configuration for [`MapsClient`]
#[derive(Clone)]
pub struct ClientConfig {
    /// API key; required
    pub api_key: String,
    /// Replaces the endpoint host (scheme + authority) when set
    pub base_url: Option<String>,
    /// Outbound ceiling; zero or less disables rate limiting
    pub requests_per_second: i32,
    /// Retry policy applied to every dispatch
    pub retry: RetryPolicy,
    /// Request timeout of the default transport
    pub timeout: Duration,
    /// Custom transport; a reqwest transport is built when `None`
    pub transport: Option<Arc<dyn Transport>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(30),
            transport: None,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("requests_per_second", &self.requests_per_second)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the base URL override
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the rate ceiling
    pub fn rate_limit(mut self, requests_per_second: i32) -> Self {
        self.config.requests_per_second = requests_per_second;
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.requests_per_second = 0;
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Use a custom transport
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Rate-limited, retrying JSON client shared by all endpoint callers
pub struct MapsClient {
    api_key: String,
    base_url: Option<String>,
    transport: RetryTransport,
    rate_limiter: RateLimiter,
}

impl MapsClient {
    /// Create a client; fails when no API key is configured.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }
        HeaderValue::from_str(&config.api_key)
            .map_err(|_| Error::config("API key contains characters not allowed in a header"))?;

        let inner: Arc<dyn Transport> = match config.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(config.timeout)?),
        };

        Ok(Self {
            api_key: config.api_key,
            base_url: config.base_url,
            transport: RetryTransport::new(inner, config.retry),
            rate_limiter: RateLimiter::new(config.requests_per_second),
        })
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_enabled()
    }

    /// The base URL override, if any
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// GET `endpoint` with `request` as query string and decode the JSON reply
    pub async fn json_get<T, Q>(
        &self,
        cancel: &CancellationToken,
        endpoint: &Endpoint,
        request: &Q,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        Q: QueryEncodable + Sync + ?Sized,
    {
        self.rate_limiter.acquire(cancel).await?;
        let request = self.build_get(endpoint, request, None::<&NoHeaders>)?;
        self.dispatch_json(&request).await
    }

    /// Like [`json_get`](Self::json_get), with extra request headers
    pub async fn json_get_with_headers<T, Q, H>(
        &self,
        cancel: &CancellationToken,
        endpoint: &Endpoint,
        request: &Q,
        headers: &H,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        Q: QueryEncodable + Sync + ?Sized,
        H: HeaderProducing + Sync + ?Sized,
    {
        self.rate_limiter.acquire(cancel).await?;
        let request = self.build_get(endpoint, request, Some(headers))?;
        self.dispatch_json(&request).await
    }

    /// POST `body` as JSON to `endpoint` and decode the JSON reply
    pub async fn json_post<T, B, H>(
        &self,
        cancel: &CancellationToken,
        endpoint: &Endpoint,
        body: &B,
        headers: &H,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
        H: HeaderProducing + Sync + ?Sized,
    {
        self.rate_limiter.acquire(cancel).await?;
        let request = self.build_post(endpoint, body, headers)?;
        self.dispatch_json(&request).await
    }

    /// Build a GET request; the credential is added as the `key` parameter.
    pub fn build_get<Q, H>(
        &self,
        endpoint: &Endpoint,
        request: &Q,
        headers: Option<&H>,
    ) -> Result<HttpRequest>
    where
        Q: QueryEncodable + ?Sized,
        H: HeaderProducing + ?Sized,
    {
        let mut url = Url::parse(&endpoint.url(self.base_url()))?;

        let mut params = request.query_params();
        params.insert(API_KEY_PARAM.to_string(), self.api_key.clone());
        url.query_pairs_mut().clear().extend_pairs(&params);

        let mut req = HttpRequest::new(Method::GET, url);
        if let Some(headers) = headers {
            apply_headers(&mut req.headers, headers)?;
        }
        Ok(req)
    }

    /// Build a POST request with a JSON body and the credential header.
    pub fn build_post<B, H>(&self, endpoint: &Endpoint, body: &B, headers: &H) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
        H: HeaderProducing + ?Sized,
    {
        let url = Url::parse(&endpoint.url(self.base_url()))?;
        let body = serde_json::to_vec(body).map_err(Error::Encode)?;

        let mut req = HttpRequest::new(Method::POST, url);
        req.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        apply_headers(&mut req.headers, headers)?;
        req.headers.insert(
            HeaderName::from_static(API_KEY_HEADER_NAME),
            HeaderValue::from_str(&self.api_key)
                .map_err(|_| Error::config("invalid API key header value"))?,
        );
        req.body = Some(Bytes::from(body));
        Ok(req)
    }

    async fn dispatch_json<T: DeserializeOwned>(&self, request: &HttpRequest) -> Result<T> {
        debug!("{} {}", request.method, request.redacted_url());

        let response = self.transport.execute(request).await?;
        decode_response(&response)
    }
}

impl std::fmt::Debug for MapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsClient")
            .field("base_url", &self.base_url)
            .field("transport", &self.transport)
            .field("rate_limiter", &self.rate_limiter)
            .finish_non_exhaustive()
    }
}

/// Map a non-200 status to [`Error::HttpStatus`], otherwise decode the body
pub fn decode_response<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    if response.status != StatusCode::OK {
        return Err(Error::http_status(response.status.as_u16()));
    }
    serde_json::from_slice(&response.body).map_err(Error::Decode)
}

fn apply_headers<H: HeaderProducing + ?Sized>(target: &mut HeaderMap, headers: &H) -> Result<()> {
    for (key, value) in headers.headers() {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| Error::invalid_request(format!("invalid header name '{key}'")))?;
        let value = HeaderValue::from_str(&value)
            .map_err(|_| Error::invalid_request(format!("invalid value for header '{key}'")))?;
        target.insert(name, value);
    }
    Ok(())
}
