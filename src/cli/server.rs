//! HTTP server mode: local REST access to the geocoding and places operations

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{Error, ErrorKind, Result};
use crate::geo::{
    GeoClient, GeocodingRequest, LatLng, NearbySearchRequest, PlacesHeader, TextSearchRequest,
};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: SocketAddr,
}

/// App state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    geo: GeoClient,
    places_header: PlacesHeader,
    shutdown: CancellationToken,
}

impl AppState {
    /// Create handler state; `places_header` holds the default field masks
    pub fn new(geo: GeoClient, places_header: PlacesHeader) -> Self {
        Self {
            geo,
            places_header,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token cancelled when the server shuts down
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// HTTP status reported to local callers for an error
pub fn error_status(err: &Error) -> StatusCode {
    match err.kind() {
        ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Transport | ErrorKind::Status | ErrorKind::Provider | ErrorKind::Decode => {
            StatusCode::BAD_GATEWAY
        }
    }
}

fn error_response(err: &Error) -> Response {
    let status = error_status(err);
    if status.is_server_error() {
        tracing::warn!("Request failed: {err}");
    }
    (status, Json(ApiResponse::<()>::error(err.to_string()))).into_response()
}

fn respond<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(e) => error_response(&e),
    }
}

fn bad_body(rejection: &JsonRejection) -> Response {
    error_response(&Error::invalid_request(rejection.body_text()))
}

/// Build the router
pub fn router(state: AppState) -> Router {
    // Build CORS layer - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/geocode", get(geocode))
        .route("/geodecode", get(geodecode))
        .route("/getplace/:place_id", get(get_place))
        .route("/places/nearby", post(nearby_search))
        .route("/places/text", post(text_search))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server; returns after Ctrl-C
pub async fn serve(config: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = state.shutdown_token();
    let app = router(state);

    tracing::info!("Starting HTTP server on http://{}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to {}: {e}", config.addr)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for shutdown signal: {e}");
            }
            tracing::info!("Shutting down");
            shutdown.cancel();
        })
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct GeocodeParams {
    address: Option<String>,
    region: Option<String>,
    language: Option<String>,
}

async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeParams>,
) -> Response {
    let request = GeocodingRequest {
        address: params.address.unwrap_or_default(),
        region: params.region.unwrap_or_default(),
        language: params.language.unwrap_or_default(),
        ..GeocodingRequest::default()
    };
    let cancel = state.shutdown.child_token();
    respond(state.geo.geocode(&cancel, &request).await)
}

#[derive(Debug, Deserialize)]
struct ReverseParams {
    lat: Option<String>,
    long: Option<String>,
    place_id: Option<String>,
    language: Option<String>,
}

fn parse_coordinate(name: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::invalid_request(format!("invalid {name} '{value}'")))
}

fn reverse_request(params: ReverseParams) -> Result<GeocodingRequest> {
    let latlng = match (params.lat.as_deref(), params.long.as_deref()) {
        (Some(lat), Some(long)) => Some(LatLng::new(
            parse_coordinate("lat", lat)?,
            parse_coordinate("long", long)?,
        )),
        (None, None) => None,
        _ => return Err(Error::invalid_request("lat and long must be given together")),
    };

    Ok(GeocodingRequest {
        latlng,
        place_id: params.place_id.unwrap_or_default(),
        language: params.language.unwrap_or_default(),
        ..GeocodingRequest::default()
    })
}

async fn geodecode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReverseParams>,
) -> Response {
    let request = match reverse_request(params) {
        Ok(request) => request,
        Err(e) => return error_response(&e),
    };
    let cancel = state.shutdown.child_token();
    respond(state.geo.reverse_geocode(&cancel, &request).await)
}

async fn get_place(State(state): State<Arc<AppState>>, Path(place_id): Path<String>) -> Response {
    let header = state.places_header.for_details();
    let cancel = state.shutdown.child_token();
    respond(state.geo.place_details(&cancel, &place_id, &header).await)
}

async fn nearby_search(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NearbySearchRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_body(&rejection),
    };
    let header = state.places_header.for_search();
    let cancel = state.shutdown.child_token();
    respond(state.geo.nearby_search(&cancel, &request, &header).await)
}

async fn text_search(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<TextSearchRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_body(&rejection),
    };
    let header = state.places_header.for_search().with_next_page_token();
    let cancel = state.shutdown.child_token();
    respond(state.geo.text_search(&cancel, &request, &header).await)
}
