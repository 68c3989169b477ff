// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # geolocate
//!
//! A relay between local callers and the Google Maps web services
//! (Geocoding API, Places API).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use geolocate::geo::{GeoClient, GeocodingRequest};
//! use geolocate::http::ClientConfig;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> geolocate::Result<()> {
//!     let config = ClientConfig::builder().api_key("...").build();
//!     let geo = GeoClient::from_config(config)?;
//!
//!     let request = GeocodingRequest::address("29 Beechwood Terr, Halifax");
//!     let response = geo.geocode(&CancellationToken::new(), &request).await?;
//!     println!("{:?}", response.results);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │        REST server (cli::server)  /  CLI (cli::runner)      │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────┴───────────────────────────────┐
//! │   geo: geocode / reverse_geocode / nearby / text / details  │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴───────────┬───────────────────┐
//! │ Rate Limiter │ Request building         │ Retrying Transport│
//! │ token bucket │ query + key / JSON + hdr │ N attempts, fixed │
//! │ cancellable  │ status → error, decode   │ delay, 5xx + I/O  │
//! └──────────────┴──────────────────────────┴───────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Request execution core: rate limiting, retries, request/response envelope
pub mod http;

/// Geocoding and places endpoint callers
pub mod geo;

/// Runtime settings
pub mod config;

/// Command-line interface and REST server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
