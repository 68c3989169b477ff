//! Runtime settings
//!
//! Settings come from command-line flags or their environment variables
//! (a `.env` file is loaded at start-up). They are turned into an explicit
//! [`ClientConfig`] and handed to whoever needs them.

use crate::http::{ClientConfig, RetryPolicy, DEFAULT_REQUESTS_PER_SECOND};
use clap::Args;
use std::time::Duration;

/// Client settings shared by every command
#[derive(Args, Clone, Default)]
pub struct Settings {
    /// Google Maps API key
    #[arg(long, env = "API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Override the provider host (e.g. a local stub)
    #[arg(long, env = "GEOLOCATE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Outbound requests per second; 0 or less disables limiting
    #[arg(long, env = "GEOLOCATE_RATE_LIMIT", global = true, allow_negative_numbers = true)]
    pub rate_limit: Option<i32>,

    /// Attempts per request, including the first
    #[arg(long, env = "GEOLOCATE_MAX_ATTEMPTS", global = true)]
    pub max_attempts: Option<u32>,

    /// Delay between attempts in milliseconds
    #[arg(long, env = "GEOLOCATE_RETRY_DELAY_MS", global = true)]
    pub retry_delay_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, env = "GEOLOCATE_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Client configuration for these settings; unset values keep their defaults
    pub fn client_config(&self) -> ClientConfig {
        let defaults = ClientConfig::default();
        let default_retry = RetryPolicy::default();

        let retry = RetryPolicy::new(
            self.max_attempts.unwrap_or(default_retry.max_attempts),
            self.retry_delay_ms
                .map_or(default_retry.delay, Duration::from_millis),
        );

        ClientConfig {
            api_key: self.api_key.clone().unwrap_or_default(),
            base_url: self.base_url.clone().filter(|url| !url.trim().is_empty()),
            requests_per_second: self.rate_limit.unwrap_or(DEFAULT_REQUESTS_PER_SECOND),
            retry,
            timeout: self.timeout_secs.map_or(defaults.timeout, Duration::from_secs),
            transport: None,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("rate_limit", &self.rate_limit)
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
