//! CLI commands and argument parsing

use crate::config::Settings;
use clap::{Parser, Subcommand};
use std::net::IpAddr;

/// Geolocation relay for the Google Maps web services
#[derive(Parser, Debug)]
#[command(name = "geolocate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server mode
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,

        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },

    /// Geocode an address
    Geocode {
        /// Street address
        #[arg(long)]
        address: String,

        /// ccTLD region bias
        #[arg(long)]
        region: Option<String>,

        /// Result language
        #[arg(long)]
        language: Option<String>,
    },

    /// Find the address of a point
    Reverse {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },

    /// Show details of a place
    Place {
        /// Place ID
        place_id: String,
    },
}
