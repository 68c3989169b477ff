//! CLI module
//!
//! Command-line interface for the relay.
//!
//! # Commands
//!
//! - `serve` - Start HTTP server mode
//! - `geocode` - Geocode an address
//! - `reverse` - Reverse geocode a point
//! - `place` - Look up a place by ID

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands};
pub use runner::Runner;
pub use server::{error_status, router, serve, AppState, ServerConfig};
