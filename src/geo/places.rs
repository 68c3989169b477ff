//! Places API (New): nearby search, text search and place details
//!
//! These calls go to `places.googleapis.com`. Searches are POSTs with a JSON
//! body; the response is trimmed by the `X-Goog-FieldMask` header.

use super::types::{LatLng, LocationRestriction, RectangularRestriction};
use super::GeoClient;
use crate::error::{Error, Result};
use crate::http::{Endpoint, HeaderProducing, NoParams};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

/// Places API root; operations are resolved from it per call
pub const PLACES_API: Endpoint = Endpoint::new("https://places.googleapis.com", "/v1/places");

/// Field mask header name
pub const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

/// Field mask entry for the pagination token of list searches
pub const MASK_NEXT_PAGE_TOKEN: &str = "nextPageToken";

/// Fields of a [`Place`] that can be requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaceFieldMask {
    DisplayName,
    DineIn,
    FormattedAddress,
    NationalPhoneNumber,
    BusinessStatus,
    Photos,
    Id,
    Rating,
    Types,
    RegularOpeningHours,
}

impl PlaceFieldMask {
    pub fn as_str(self) -> &'static str {
        match self {
            PlaceFieldMask::DisplayName => "displayName",
            PlaceFieldMask::DineIn => "dineIn",
            PlaceFieldMask::FormattedAddress => "formattedAddress",
            PlaceFieldMask::NationalPhoneNumber => "nationalPhoneNumber",
            PlaceFieldMask::BusinessStatus => "businessStatus",
            PlaceFieldMask::Photos => "photos",
            PlaceFieldMask::Id => "id",
            PlaceFieldMask::Rating => "rating",
            PlaceFieldMask::Types => "types",
            PlaceFieldMask::RegularOpeningHours => "regularOpeningHours",
        }
    }

    /// Fields requested when the caller does not choose
    pub fn defaults() -> Vec<PlaceFieldMask> {
        vec![
            PlaceFieldMask::BusinessStatus,
            PlaceFieldMask::FormattedAddress,
            PlaceFieldMask::DisplayName,
            PlaceFieldMask::Id,
            PlaceFieldMask::Types,
            PlaceFieldMask::RegularOpeningHours,
        ]
    }
}

/// Headers for a Places call: the field mask restricting the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacesHeader {
    pub field_masks: Vec<PlaceFieldMask>,
    /// Prefix each field with `places.`; needed for list searches only
    pub field_mask_prefix: bool,
    /// Extra raw mask entry, usually [`MASK_NEXT_PAGE_TOKEN`]
    pub token_mask: Option<String>,
}

impl Default for PlacesHeader {
    fn default() -> Self {
        Self {
            field_masks: PlaceFieldMask::defaults(),
            field_mask_prefix: false,
            token_mask: None,
        }
    }
}

impl PlacesHeader {
    /// Same masks, prefixed for a list search
    #[must_use]
    pub fn for_search(&self) -> Self {
        Self {
            field_mask_prefix: true,
            ..self.clone()
        }
    }

    /// Same masks, unprefixed for a single place lookup
    #[must_use]
    pub fn for_details(&self) -> Self {
        Self {
            field_mask_prefix: false,
            token_mask: None,
            ..self.clone()
        }
    }

    /// Also request the next page token
    #[must_use]
    pub fn with_next_page_token(mut self) -> Self {
        self.token_mask = Some(MASK_NEXT_PAGE_TOKEN.to_string());
        self
    }

    /// Comma-separated field mask value
    pub fn field_mask(&self) -> String {
        field_mask_entries(&self.field_masks, self.field_mask_prefix, self.token_mask.as_deref())
            .join(",")
    }
}

impl HeaderProducing for PlacesHeader {
    fn headers(&self) -> HashMap<String, String> {
        HashMap::from([(FIELD_MASK_HEADER.to_string(), self.field_mask())])
    }
}

/// Field mask entries, optionally `places.`-prefixed, plus a token mask
pub fn field_mask_entries(
    masks: &[PlaceFieldMask],
    prefixed: bool,
    token_mask: Option<&str>,
) -> Vec<String> {
    let prefix = if prefixed { "places." } else { "" };
    let mut entries: Vec<String> = masks
        .iter()
        .map(|mask| format!("{prefix}{}", mask.as_str()))
        .collect();
    if let Some(token) = token_mask.filter(|t| !t.is_empty()) {
        entries.push(token.to_string());
    }
    entries
}

/// Place type used to filter searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceType {
    AcaiShop,
    AfghaniRestaurant,
    AfricanRestaurant,
    AmericanRestaurant,
    AsianRestaurant,
    BagelShop,
    Bakery,
    Bar,
    BarAndGrill,
    BarbecueRestaurant,
    BrazilianRestaurant,
    BreakfastRestaurant,
    BrunchRestaurant,
    BuffetRestaurant,
    Cafe,
    Cafeteria,
    CandyStore,
    CatCafe,
    ChineseRestaurant,
    ChocolateFactory,
    ChocolateShop,
    CoffeeShop,
    Confectionery,
    Deli,
    DessertRestaurant,
    DessertShop,
    Diner,
    DogCafe,
    DonutShop,
    FastFoodRestaurant,
    FineDiningRestaurant,
    FoodCourt,
    FrenchRestaurant,
    GreekRestaurant,
    HamburgerRestaurant,
    IceCreamShop,
    IndianRestaurant,
    IndonesianRestaurant,
    ItalianRestaurant,
    JapaneseRestaurant,
    JuiceShop,
    KoreanRestaurant,
    LebaneseRestaurant,
    MealDelivery,
    MealTakeaway,
    MediterraneanRestaurant,
    MexicanRestaurant,
    MiddleEasternRestaurant,
    PizzaRestaurant,
    Pub,
    RamenRestaurant,
    Restaurant,
    SandwichShop,
    SeafoodRestaurant,
    SpanishRestaurant,
    SteakHouse,
    SushiRestaurant,
    TeaHouse,
    ThaiRestaurant,
    TurkishRestaurant,
    VeganRestaurant,
    VegetarianRestaurant,
    VietnameseRestaurant,
    WineBar,
}

impl PlaceType {
    /// Every supported food and drink type
    #[rustfmt::skip]
    pub fn all() -> Vec<PlaceType> {
        use PlaceType::*;
        vec![
            AcaiShop, AfghaniRestaurant, AfricanRestaurant, AmericanRestaurant,
            AsianRestaurant, BagelShop, Bakery, Bar, BarAndGrill, BarbecueRestaurant,
            BrazilianRestaurant, BreakfastRestaurant, BrunchRestaurant, BuffetRestaurant,
            Cafe, Cafeteria, CandyStore, CatCafe, ChineseRestaurant, ChocolateFactory,
            ChocolateShop, CoffeeShop, Confectionery, Deli, DessertRestaurant,
            DessertShop, Diner, DogCafe, DonutShop, FastFoodRestaurant,
            FineDiningRestaurant, FoodCourt, FrenchRestaurant, GreekRestaurant,
            HamburgerRestaurant, IceCreamShop, IndianRestaurant, IndonesianRestaurant,
            ItalianRestaurant, JapaneseRestaurant, JuiceShop, KoreanRestaurant,
            LebaneseRestaurant, MealDelivery, MealTakeaway, MediterraneanRestaurant,
            MexicanRestaurant, MiddleEasternRestaurant, PizzaRestaurant, Pub,
            RamenRestaurant, Restaurant, SandwichShop, SeafoodRestaurant,
            SpanishRestaurant, SteakHouse, SushiRestaurant, TeaHouse, ThaiRestaurant,
            TurkishRestaurant, VeganRestaurant, VegetarianRestaurant,
            VietnameseRestaurant, WineBar,
        ]
    }

    /// Sit-down food and drink places; excludes delivery, takeaway and shops
    /// that rarely have seating
    #[rustfmt::skip]
    pub fn defaults() -> Vec<PlaceType> {
        use PlaceType::*;
        vec![
            AsianRestaurant, BagelShop, Bakery, Bar, BarAndGrill, BarbecueRestaurant,
            BreakfastRestaurant, BrunchRestaurant, BuffetRestaurant, Cafe, CatCafe,
            ChocolateShop, CoffeeShop, DessertRestaurant, DessertShop, Diner, DogCafe,
            FastFoodRestaurant, FineDiningRestaurant, IceCreamShop, IndianRestaurant,
            IndonesianRestaurant, ItalianRestaurant, JapaneseRestaurant, JuiceShop,
            KoreanRestaurant, LebaneseRestaurant, MediterraneanRestaurant,
            MexicanRestaurant, MiddleEasternRestaurant, PizzaRestaurant, Pub,
            RamenRestaurant, Restaurant, SeafoodRestaurant, SpanishRestaurant,
            SteakHouse, SushiRestaurant, TeaHouse, ThaiRestaurant, TurkishRestaurant,
            VeganRestaurant, VegetarianRestaurant, VietnameseRestaurant, WineBar,
        ]
    }
}

/// Price level of a place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceLevel {
    PriceLevelUnspecified,
    PriceLevelFree,
    PriceLevelInexpensive,
    PriceLevelModerate,
    PriceLevelExpensive,
    PriceLevelVeryExpensive,
}

/// Operational status of a business
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessStatus {
    #[default]
    BusinessStatusUnspecified,
    Operational,
    ClosedTemporarily,
    ClosedPermanently,
}

/// Ordering of search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RankPreference {
    RankPreferenceUnspecified,
    Distance,
    Popularity,
    Relevance,
}

/// Text with its language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalizedText {
    pub text: String,
    pub language_code: String,
}

/// Photo reference attached to a place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Photo {
    /// Resource name used to fetch the photo
    pub name: String,
    #[serde(rename = "heightPx")]
    pub height: u32,
    #[serde(rename = "widthPx")]
    pub width: u32,
    pub flag_content_uri: String,
    pub google_maps_uri: String,
}

/// IANA time zone of a place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeZone {
    pub id: String,
    pub version: String,
}

/// Regular weekly opening hours
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpeningHours {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    pub weekday_descriptions: Vec<String>,
}

/// A place as returned by the Places API; absent fields were masked out
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Place {
    pub id: String,
    pub display_name: LocalizedText,
    pub types: Vec<String>,
    pub formatted_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_level: Option<PriceLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,
    pub business_status: BusinessStatus,
    #[serde(rename = "nationalPhoneNumber")]
    pub phone_number: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<Photo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<TimeZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_opening_hours: Option<OpeningHours>,
}

/// Response of a nearby or text search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlacesSearchResponse {
    pub places: Vec<Place>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub next_page_token: String,
}

/// Search for places within a circular area
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbySearchRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region_code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included_types: Vec<PlaceType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included_primary_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_primary_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_result_count: Option<u32>,
    #[serde(default)]
    pub location_restriction: Option<LocationRestriction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_preference: Option<RankPreference>,
}

/// Search for places matching a text query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSearchRequest {
    #[serde(default)]
    pub text_query: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub included_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub include_pure_service_area_businesses: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page_token: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub strict_type_filtering: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_bias: Option<LocationRestriction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_preference: Option<RankPreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_restriction: Option<RectangularRestriction>,
}

impl GeoClient {
    /// Search for places of the requested types around a point.
    pub async fn nearby_search(
        &self,
        cancel: &CancellationToken,
        request: &NearbySearchRequest,
        header: &PlacesHeader,
    ) -> Result<PlacesSearchResponse> {
        if request.location_restriction.is_none() {
            return Err(Error::invalid_request(
                "required field location_restriction missing",
            ));
        }
        self.client()
            .json_post(cancel, &PLACES_API.resolve(":searchNearby"), request, header)
            .await
    }

    /// Search for places matching a text query, or fetch the next page.
    pub async fn text_search(
        &self,
        cancel: &CancellationToken,
        request: &TextSearchRequest,
        header: &PlacesHeader,
    ) -> Result<PlacesSearchResponse> {
        if request.text_query.is_empty() && request.page_token.is_empty() {
            return Err(Error::invalid_request(
                "required fields text_query and page_token are both empty",
            ));
        }
        self.client()
            .json_post(cancel, &PLACES_API.resolve(":searchText"), request, header)
            .await
    }

    /// Look up a single place by its ID.
    pub async fn place_details(
        &self,
        cancel: &CancellationToken,
        place_id: &str,
        header: &PlacesHeader,
    ) -> Result<Place> {
        let place_id = place_id.trim();
        if !is_valid_place_id(place_id) {
            return Err(Error::invalid_request(format!("invalid place id '{place_id}'")));
        }
        let endpoint = PLACES_API.resolve(&format!("/{place_id}"));
        self.client()
            .json_get_with_headers(cancel, &endpoint, &NoParams, header)
            .await
    }
}

/// Place IDs are URL-safe base64 tokens and go into the path as one segment
fn is_valid_place_id(place_id: &str) -> bool {
    !place_id.is_empty()
        && place_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
