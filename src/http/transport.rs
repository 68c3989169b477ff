//! Network transport
//!
//! Requests and responses are described as plain data so the retry layer can
//! re-issue the same request and tests can stand in for the network. The
//! default transport executes them with a shared `reqwest::Client`, which
//! also owns the connection pool reused across concurrent calls.

use crate::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use std::time::Duration;
use url::Url;

/// A fully built outbound request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Create a request without headers or body
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// URL with the `key` query parameter masked, for logging
    pub fn redacted_url(&self) -> String {
        let mut url = self.url.clone();
        if url.query_pairs().any(|(k, _)| k == "key") {
            let pairs: Vec<(String, String)> = self
                .url
                .query_pairs()
                .map(|(k, v)| {
                    let v = if k == "key" { "***".into() } else { v.into_owned() };
                    (k.into_owned(), v)
                })
                .collect();
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }
        url.to_string()
    }
}

/// A received response with its body fully read
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response with the given status and body
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Executes one request against the network
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Default transport backed by reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with the given per-request timeout
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("geolocate/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut req = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            req = req.body(body.clone());
        }

        // reqwest errors render the request URL, which carries the credential
        let response = req.send().await.map_err(strip_url)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(strip_url)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn strip_url(err: reqwest::Error) -> TransportError {
    TransportError::Reqwest(err.without_url())
}
