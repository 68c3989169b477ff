//! Endpoint callers
//!
//! Typed operations on top of [`MapsClient`]: geocoding, reverse geocoding
//! and the Places API searches and lookups.

mod geocoding;
mod places;
mod types;

pub use geocoding::{
    AddressComponent, AddressGeometry, GeocodeAccuracy, GeocodingRequest, GeocodingResponse,
    GeocodingResult, NavigationPoint, PlusCode, GEOCODING_API,
};
pub use places::{
    field_mask_entries, BusinessStatus, LocalizedText, NearbySearchRequest, OpeningHours, Photo,
    Place, PlaceFieldMask, PlaceType, PlacesHeader, PlacesSearchResponse, PriceLevel,
    RankPreference, TextSearchRequest, TimeZone, FIELD_MASK_HEADER, MASK_NEXT_PAGE_TOKEN,
    PLACES_API,
};
pub use types::{Circle, LatLng, LatLngBounds, LocationRestriction, Rectangle, RectangularRestriction};

use crate::error::Result;
use crate::http::{ClientConfig, MapsClient};
use std::sync::Arc;

/// Client for the geocoding and places operations
#[derive(Debug, Clone)]
pub struct GeoClient {
    client: Arc<MapsClient>,
}

impl GeoClient {
    /// Wrap a shared client
    pub fn new(client: Arc<MapsClient>) -> Self {
        Self { client }
    }

    /// Build the underlying client from a config
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(MapsClient::new(config)?)))
    }

    /// The underlying request execution client
    pub fn client(&self) -> &MapsClient {
        &self.client
    }
}
