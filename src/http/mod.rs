//! HTTP client module
//!
//! Provides the request execution core shared by every endpoint caller.
//!
//! # Features
//!
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Automatic Retries**: Fixed attempt count and delay on transport errors and 5xx
//! - **Uniform Envelope**: Query/JSON encoding, credential injection, status mapping
//! - **Pluggable Transport**: Requests as plain data, executed by reqwest by default

mod client;
mod rate_limit;
mod request;
mod retry;
mod status;
mod transport;

pub use client::{
    decode_response, ClientConfig, ClientConfigBuilder, MapsClient, API_KEY_HEADER, API_KEY_PARAM,
};
pub use rate_limit::{RateLimiter, DEFAULT_REQUESTS_PER_SECOND};
pub use request::{
    resolved_path, Endpoint, HeaderProducing, NoHeaders, NoParams, QueryEncodable, QueryParams,
};
pub use retry::{default_should_retry, RetryPolicy, RetryTransport, ShouldRetry};
pub use status::{ProviderStatus, STATUS_OK, STATUS_ZERO_RESULTS};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
