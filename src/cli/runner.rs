//! Command runner

use super::commands::{Cli, Commands};
use super::server::{self, AppState, ServerConfig};
use crate::error::{Error, Result};
use crate::geo::{GeoClient, GeocodingRequest, PlacesHeader};
use serde::Serialize;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Runs a parsed command line
pub struct Runner {
    cli: Cli,
}

impl Runner {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected command
    pub async fn run(self) -> Result<()> {
        debug!("Settings: {:?}", self.cli.settings);
        let geo = GeoClient::from_config(self.cli.settings.client_config())?;
        let cancel = CancellationToken::new();

        match self.cli.command {
            Commands::Serve { host, port } => {
                let config = ServerConfig {
                    addr: SocketAddr::new(host, port),
                };
                server::serve(config, AppState::new(geo, PlacesHeader::default())).await
            }
            Commands::Geocode {
                address,
                region,
                language,
            } => {
                let request = GeocodingRequest {
                    address,
                    region: region.unwrap_or_default(),
                    language: language.unwrap_or_default(),
                    ..GeocodingRequest::default()
                };
                print_json(&geo.geocode(&cancel, &request).await?)
            }
            Commands::Reverse { lat, lng } => {
                let request = GeocodingRequest::latlng(lat, lng);
                print_json(&geo.reverse_geocode(&cancel, &request).await?)
            }
            Commands::Place { place_id } => {
                let place = geo
                    .place_details(&cancel, &place_id, &PlacesHeader::default())
                    .await?;
                print_json(&place)
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).map_err(Error::Encode)?;
    println!("{output}");
    Ok(())
}
