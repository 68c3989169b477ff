//! Error types for geolocate
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! HTTP-level failures (`HttpStatus`) are kept apart from failures the
//! provider reports inside a successful response body (`Provider`).

use thiserror::Error;

/// Failure of the network exchange itself (no HTTP response was produced)
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("connection failed: {0}")]
    Connection(String),
}

impl TransportError {
    /// Create a connection error from a message
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }
}

/// The main error type for geolocate
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("maps: API Key missing")]
    MissingApiKey,

    // ============================================================================
    // Request Errors
    // ============================================================================
    #[error("Request cancelled while waiting for the rate limiter")]
    Cancelled,

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("HTTP {status}: {}", status_message(*status))]
    HttpStatus { status: u16 },

    #[error("maps: {status} - {message}")]
    Provider { status: String, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`], used at the REST boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Cancelled,
    InvalidRequest,
    Transport,
    Status,
    Provider,
    Decode,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error for a malformed caller request
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16) -> Self {
        Self::HttpStatus { status }
    }

    /// Create a provider (payload status) error
    pub fn provider(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            status: status.into(),
            message: message.into(),
        }
    }

    /// HTTP status code carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status } => Some(*status),
            _ => None,
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. } | Error::MissingApiKey | Error::Io(_) => {
                ErrorKind::Configuration
            }
            Error::Cancelled => ErrorKind::Cancelled,
            Error::InvalidRequest { .. } | Error::Encode(_) | Error::InvalidUrl(_) => {
                ErrorKind::InvalidRequest
            }
            Error::Transport(_) => ErrorKind::Transport,
            Error::HttpStatus { .. } => ErrorKind::Status,
            Error::Provider { .. } => ErrorKind::Provider,
            Error::Decode(_) => ErrorKind::Decode,
        }
    }
}

/// Human-readable message for an HTTP status code returned by the provider
pub fn status_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request.",
        401 => "Unauthorized. Invalid credentials.",
        403 => "Access denied. Check permissions.",
        404 => "Resource not found.",
        500 => "Internal Server side error.",
        502 => "Bad Gateway.",
        503 => "Service is temporarily unavailable.",
        _ => "An unknown error occurred.",
    }
}

/// Result type alias for geolocate
pub type Result<T> = std::result::Result<T, Error>;
