// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! geolocate CLI
//!
//! Command-line interface and local REST server for the geolocation relay

use clap::Parser;
use geolocate::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; settings may come from the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
