//! Geocoding and reverse geocoding

use super::types::{LatLng, LatLngBounds};
use super::GeoClient;
use crate::error::{Error, Result};
use crate::http::{Endpoint, ProviderStatus, QueryEncodable, QueryParams};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Geocoding web service
pub const GEOCODING_API: Endpoint =
    Endpoint::new("https://maps.googleapis.com", "/maps/api/geocode/json");

/// Precision of a geocoded location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeocodeAccuracy {
    /// Accurate down to street address precision
    Rooftop,
    /// Interpolated between two precise points
    RangeInterpolated,
    /// Geometric center of a polyline or polygon
    GeometricCenter,
    Approximate,
}

impl GeocodeAccuracy {
    pub fn as_str(self) -> &'static str {
        match self {
            GeocodeAccuracy::Rooftop => "ROOFTOP",
            GeocodeAccuracy::RangeInterpolated => "RANGE_INTERPOLATED",
            GeocodeAccuracy::GeometricCenter => "GEOMETRIC_CENTER",
            GeocodeAccuracy::Approximate => "APPROXIMATE",
        }
    }
}

/// Request for both forward and reverse geocoding
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeocodingRequest {
    /// Street address to geocode
    #[serde(default)]
    pub address: String,
    /// Component filters, e.g. `country` → `CA`
    #[serde(default)]
    pub components: BTreeMap<String, String>,
    /// ccTLD region bias
    #[serde(default)]
    pub region: String,
    /// Reverse geocoding: accepted location types
    #[serde(default)]
    pub location_type: Vec<GeocodeAccuracy>,
    /// Reverse geocoding: point to look up
    #[serde(default)]
    pub latlng: Option<LatLng>,
    /// Reverse geocoding: accepted result types
    #[serde(default)]
    pub result_type: Vec<String>,
    /// Reverse geocoding: place to look up
    #[serde(default)]
    pub place_id: String,
    #[serde(default)]
    pub language: String,
    /// Extra raw query parameters; typed fields win on conflict
    #[serde(default)]
    pub custom: QueryParams,
}

impl GeocodingRequest {
    /// Forward geocoding request for an address
    pub fn address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Reverse geocoding request for a point
    pub fn latlng(lat: f64, lng: f64) -> Self {
        Self {
            latlng: Some(LatLng::new(lat, lng)),
            ..Self::default()
        }
    }
}

impl QueryEncodable for GeocodingRequest {
    fn query_params(&self) -> QueryParams {
        let mut q = self.custom.clone();

        if !self.address.is_empty() {
            q.insert("address".into(), self.address.clone());
        }
        if !self.components.is_empty() {
            let filters: Vec<String> = self
                .components
                .iter()
                .map(|(component, value)| format!("{component}:{value}"))
                .collect();
            q.insert("components".into(), filters.join("|"));
        }
        if !self.region.is_empty() {
            q.insert("region".into(), self.region.clone());
        }
        if let Some(latlng) = &self.latlng {
            q.insert("latlng".into(), latlng.to_string());
        }
        if !self.result_type.is_empty() {
            q.insert("result_type".into(), self.result_type.join("|"));
        }
        if !self.location_type.is_empty() {
            let types: Vec<&str> = self.location_type.iter().map(|t| t.as_str()).collect();
            q.insert("location_type".into(), types.join("|"));
        }
        if !self.place_id.is_empty() {
            q.insert("place_id".into(), self.place_id.clone());
        }
        if !self.language.is_empty() {
            q.insert("language".into(), self.language.clone());
        }
        q
    }
}

/// Result of a geocoding call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodingResponse {
    pub results: Vec<GeocodingResult>,
}

/// A single geocoded address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingResult {
    pub address_components: Vec<AddressComponent>,
    pub formatted_address: String,
    pub geometry: AddressGeometry,
    pub types: Vec<String>,
    pub place_id: String,
    pub navigation_points: Vec<NavigationPoint>,
    /// The geocoder only matched part of the requested address
    pub partial_match: bool,
    pub plus_code: PlusCode,
}

/// Part of an address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    pub types: Vec<String>,
}

/// Location and extent of an address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressGeometry {
    pub location: LatLng,
    pub location_type: String,
    pub bounds: LatLngBounds,
    pub viewport: LatLngBounds,
    pub types: Vec<String>,
}

/// Suggested point to navigate to for a result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationPoint {
    pub location: LatLng,
}

/// Open Location Code for the result (see <https://plus.codes/>)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlusCode {
    /// Area code plus local code, e.g. `849VCWC8+R9`
    pub global_code: String,
    /// Local code with a locality, e.g. `CWC8+R9, Mountain View, CA, USA`
    pub compound_code: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingEnvelope {
    #[serde(default)]
    results: Vec<GeocodingResult>,
    #[serde(flatten)]
    status: ProviderStatus,
}

impl GeoClient {
    /// Convert a human-readable address into coordinates.
    pub async fn geocode(
        &self,
        cancel: &CancellationToken,
        request: &GeocodingRequest,
    ) -> Result<GeocodingResponse> {
        if request.address.is_empty() && request.components.is_empty() {
            return Err(Error::invalid_request(
                "required fields address and/or components are all missing",
            ));
        }
        self.geocoding_call(cancel, request).await
    }

    /// Convert a point or place ID into a human-readable address.
    pub async fn reverse_geocode(
        &self,
        cancel: &CancellationToken,
        request: &GeocodingRequest,
    ) -> Result<GeocodingResponse> {
        if !request.address.is_empty() {
            return Err(Error::invalid_request(
                "address must be empty, provide only latlng or place_id",
            ));
        }
        if request.latlng.is_none() && request.place_id.is_empty() {
            return Err(Error::invalid_request(
                "required fields latlng and/or place_id are both missing",
            ));
        }
        self.geocoding_call(cancel, request).await
    }

    async fn geocoding_call(
        &self,
        cancel: &CancellationToken,
        request: &GeocodingRequest,
    ) -> Result<GeocodingResponse> {
        let envelope: GeocodingEnvelope = self
            .client()
            .json_get(cancel, &GEOCODING_API, request)
            .await?;
        envelope.status.check()?;

        debug!(
            "Geocoding returned {} result(s) with status {}",
            envelope.results.len(),
            envelope.status.status
        );
        Ok(GeocodingResponse {
            results: envelope.results,
        })
    }
}
