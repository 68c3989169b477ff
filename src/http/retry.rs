//! Retrying transport
//!
//! Re-issues a request a fixed number of times with a constant delay when the
//! network exchange fails or the provider answers with a 5xx status.
//!
//! The policy does not look at the method: a POST answered with a 5xx is sent
//! again even if the provider applied it. Retry sleeps do not observe
//! cancellation; a call holds its task for the whole retry sequence.

use super::transport::{HttpRequest, HttpResponse, Transport};
use crate::error::TransportError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Decides whether an attempt should be repeated
pub type ShouldRetry = fn(Option<&HttpResponse>, Option<&TransportError>) -> bool;

/// Bounded retry policy: attempt ceiling, fixed delay and a retry predicate
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay between two attempts
    pub delay: Duration,
    /// Retry predicate
    pub should_retry: ShouldRetry,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
            should_retry: default_should_retry,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default predicate
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            should_retry: default_should_retry,
        }
    }

    /// Replace the retry predicate
    #[must_use]
    pub fn with_predicate(mut self, should_retry: ShouldRetry) -> Self {
        self.should_retry = should_retry;
        self
    }

    /// A policy making exactly one attempt
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

/// Retry on transport errors and 5xx responses
pub fn default_should_retry(
    response: Option<&HttpResponse>,
    error: Option<&TransportError>,
) -> bool {
    if error.is_some() {
        return true;
    }
    response.is_some_and(|r| r.status.is_server_error())
}

/// "retry 1 of 2" for the first retry of a three-attempt policy
fn retry_label(attempt: u32, max_attempts: u32) -> String {
    format!("retry {attempt} of {}", max_attempts.saturating_sub(1))
}

/// Transport wrapper applying a [`RetryPolicy`]
pub struct RetryTransport {
    inner: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl RetryTransport {
    pub fn new(inner: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute `request`, returning the last outcome once the policy gives up.
    pub async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let outcome = self.inner.send(request).await;
            let retry = match &outcome {
                Ok(response) => (self.policy.should_retry)(Some(response), None),
                Err(e) => (self.policy.should_retry)(None, Some(e)),
            };

            if !retry || attempt >= max_attempts {
                return outcome;
            }

            match &outcome {
                Ok(response) => warn!(
                    "Request to {} returned {}, {} in {:?}",
                    request.url.path(),
                    response.status.as_u16(),
                    retry_label(attempt, max_attempts),
                    self.policy.delay
                ),
                Err(e) => warn!(
                    "Request to {} failed ({}), {} in {:?}",
                    request.url.path(),
                    e,
                    retry_label(attempt, max_attempts),
                    self.policy.delay
                ),
            }

            tokio::time::sleep(self.policy.delay).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl Transport for RetryTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.execute(request).await
    }
}

impl std::fmt::Debug for RetryTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryTransport")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod retry_tests {
    use super::*;
    use reqwest::{Method, StatusCode};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;
    use url::Url;

    /// Replays a scripted list of outcomes, repeating the last one
    struct ScriptedTransport {
        script: Mutex<Vec<Result<u16, &'static str>>>,
        calls: AtomicU32,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<u16, &'static str>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            let script = self.script.lock().unwrap();
            let step = script[n.min(script.len() - 1)];
            match step {
                Ok(status) => Ok(HttpResponse::new(
                    StatusCode::from_u16(status).unwrap(),
                    format!("attempt {}", n + 1),
                )),
                Err(message) => Err(TransportError::connection(message)),
            }
        }
    }

    fn request() -> HttpRequest {
        HttpRequest::new(
            Method::GET,
            Url::parse("https://maps.example.com/geocode").unwrap(),
        )
    }

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[test]
    fn test_retry_label_counts_retries() {
        assert_eq!(retry_label(1, 3), "retry 1 of 2");
        assert_eq!(retry_label(2, 3), "retry 2 of 2");
        assert_eq!(retry_label(4, 5), "retry 4 of 4");
    }

    #[test]
    fn test_default_should_retry() {
        let ok = HttpResponse::new(StatusCode::OK, "");
        let bad = HttpResponse::new(StatusCode::BAD_REQUEST, "");
        let unavailable = HttpResponse::new(StatusCode::SERVICE_UNAVAILABLE, "");
        let err = TransportError::connection("reset");

        assert!(!default_should_retry(Some(&ok), None));
        assert!(!default_should_retry(Some(&bad), None));
        assert!(default_should_retry(Some(&unavailable), None));
        assert!(default_should_retry(None, Some(&err)));
        assert!(!default_should_retry(None, None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_errors_then_success() {
        let stub = ScriptedTransport::new(vec![Err("refused"), Err("refused"), Ok(200)]);
        let transport = RetryTransport::new(stub.clone(), RetryPolicy::default());

        let start = Instant::now();
        let response = transport.execute(&request()).await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(stub.calls(), 3);
        // two delays of 2s each
        assert!(elapsed >= Duration::from_secs(4));
        assert!(elapsed < Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_503_returned_unmodified() {
        let stub = ScriptedTransport::new(vec![Ok(503)]);
        let transport = RetryTransport::new(stub.clone(), RetryPolicy::default());

        let response = transport.execute(&request()).await.unwrap();

        assert_eq!(stub.calls(), 3);
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.body, "attempt 3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_not_retried() {
        let stub = ScriptedTransport::new(vec![Ok(404), Ok(200)]);
        let transport = RetryTransport::new(stub.clone(), RetryPolicy::default());

        let start = Instant::now();
        let response = transport.execute(&request()).await.unwrap();

        assert_eq!(stub.calls(), 1);
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_transport_error_surfaces() {
        let stub = ScriptedTransport::new(vec![Err("dns failure")]);
        let transport = RetryTransport::new(stub.clone(), RetryPolicy::default());

        let result = transport.execute(&request()).await;

        assert_eq!(stub.calls(), 3);
        assert!(matches!(result, Err(TransportError::Connection(m)) if m == "dns failure"));
    }

    #[tokio::test]
    async fn test_no_retry_policy_single_attempt() {
        let stub = ScriptedTransport::new(vec![Ok(500), Ok(200)]);
        let transport = RetryTransport::new(stub.clone(), RetryPolicy::no_retry());

        let response = transport.execute(&request()).await.unwrap();
        assert_eq!(stub.calls(), 1);
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_predicate() {
        fn retry_on_429(response: Option<&HttpResponse>, _: Option<&TransportError>) -> bool {
            response.is_some_and(|r| r.status == StatusCode::TOO_MANY_REQUESTS)
        }

        let stub = ScriptedTransport::new(vec![Ok(429), Ok(200)]);
        let policy = RetryPolicy::new(5, Duration::from_millis(100)).with_predicate(retry_on_429);
        let transport = RetryTransport::new(stub.clone(), policy);

        let response = transport.execute(&request()).await.unwrap();
        assert_eq!(stub.calls(), 2);
        assert_eq!(response.status, StatusCode::OK);
    }
}
