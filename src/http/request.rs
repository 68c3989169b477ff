//! Request shapes and endpoint descriptors
//!
//! Endpoint callers describe a call through two capabilities:
//! [`QueryEncodable`] for GET parameters and [`HeaderProducing`] for the
//! extra headers of POST calls (and GET calls that need them). Which one a
//! call needs is decided by the client method's trait bounds.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// Query parameters, kept sorted so encoded URLs are deterministic
pub type QueryParams = BTreeMap<String, String>;

/// Request that renders itself into URL query parameters
pub trait QueryEncodable {
    fn query_params(&self) -> QueryParams;
}

/// Request that renders a set of HTTP headers
pub trait HeaderProducing {
    fn headers(&self) -> HashMap<String, String>;
}

/// A request without parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParams;

impl QueryEncodable for NoParams {
    fn query_params(&self) -> QueryParams {
        QueryParams::new()
    }
}

/// No additional headers
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHeaders;

impl HeaderProducing for NoHeaders {
    fn headers(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}

impl QueryEncodable for QueryParams {
    fn query_params(&self) -> QueryParams {
        self.clone()
    }
}

impl HeaderProducing for HashMap<String, String> {
    fn headers(&self) -> HashMap<String, String> {
        self.clone()
    }
}

impl<T: QueryEncodable + ?Sized> QueryEncodable for &T {
    fn query_params(&self) -> QueryParams {
        (**self).query_params()
    }
}

impl<T: HeaderProducing + ?Sized> HeaderProducing for &T {
    fn headers(&self) -> HashMap<String, String> {
        (**self).headers()
    }
}

/// Host and resource path of a remote operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: Cow<'static, str>,
    pub path: Cow<'static, str>,
}

impl Endpoint {
    pub const fn new(host: &'static str, path: &'static str) -> Self {
        Self {
            host: Cow::Borrowed(host),
            path: Cow::Borrowed(path),
        }
    }

    /// A new descriptor for this operation with `suffix` appended to the path.
    ///
    /// The receiver is left untouched, so one descriptor can serve concurrent
    /// calls for different identifiers.
    #[must_use]
    pub fn resolve(&self, suffix: &str) -> Endpoint {
        Endpoint {
            host: self.host.clone(),
            path: Cow::Owned(resolved_path(self, suffix)),
        }
    }

    /// Full URL for this endpoint, with an optional host override
    pub fn url(&self, base_url: Option<&str>) -> String {
        let host = base_url.unwrap_or(self.host.as_ref()).trim_end_matches('/');
        if self.path.is_empty() {
            return host.to_string();
        }
        format!("{host}/{}", self.path.trim_start_matches('/'))
    }
}

/// Path of `endpoint` with `suffix` appended
pub fn resolved_path(endpoint: &Endpoint, suffix: &str) -> String {
    format!("{}{suffix}", endpoint.path)
}
