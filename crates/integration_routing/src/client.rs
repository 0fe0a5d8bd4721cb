//! OpenRouteService directions client
//!
//! Requests GeoJSON directions from the
//! [OpenRouteService v2 API](https://openrouteservice.org/dev/#/api-docs/v2/directions).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::RoutingConfig;
use crate::error::RoutingError;
use crate::models::{AvoidFeature, Directions, DirectionsRequest, Preference, Waypoint};

/// ORS error codes meaning "no route" rather than a broken request
const ORS_NO_ROUTE_CODES: [u32; 3] = [2004, 2009, 2010];

/// Trait for directions clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Request a route between two points
    async fn directions(&self, request: &DirectionsRequest) -> Result<Directions, RoutingError>;

    /// Provider name for logs
    fn provider_name(&self) -> &'static str;
}

/// OpenRouteService-based directions client
#[derive(Debug)]
pub struct OpenRouteServiceClient {
    client: Client,
    config: RoutingConfig,
}

impl OpenRouteServiceClient {
    /// Create a new OpenRouteService client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client cannot
    /// be initialized.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        if config.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(RoutingError::ConfigurationError(
                "OpenRouteService requires an api_key".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("GreenRoute/1.0")
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Build the JSON body for a directions request
    fn request_body(request: &DirectionsRequest) -> OrsDirectionsBody {
        let options = if request.avoid.is_empty() {
            None
        } else {
            Some(OrsOptions {
                avoid_features: request.avoid.clone(),
            })
        };

        OrsDirectionsBody {
            coordinates: vec![request.from.lon_lat(), request.to.lon_lat()],
            preference: request.preference,
            options,
        }
    }

    /// Parse a successful GeoJSON directions response
    fn parse_directions_response(body: &str, profile: &str) -> Result<Directions, RoutingError> {
        let raw: RawFeatureCollection =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

        let feature = raw
            .features
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::NoRouteFound {
                profile: profile.to_string(),
                reason: "response contained no features".to_string(),
            })?;

        let summary = feature.properties.summary;
        let coordinates = feature
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Waypoint::new(lat, lon))
            .collect();

        Ok(Directions {
            coordinates,
            distance_m: summary.distance,
            duration_s: summary.duration,
        })
    }

    /// Map an error response to a typed error
    fn classify_error(status: StatusCode, body: &str, profile: &str) -> RoutingError {
        let raw = serde_json::from_str::<RawErrorResponse>(body).ok();
        let code = raw.as_ref().and_then(|r| r.error.code);
        let message = raw
            .and_then(|r| r.error.message)
            .unwrap_or_else(|| format!("HTTP {status}"));

        if status == StatusCode::NOT_FOUND || code.is_some_and(|c| ORS_NO_ROUTE_CODES.contains(&c)) {
            return RoutingError::NoRouteFound {
                profile: profile.to_string(),
                reason: message,
            };
        }

        RoutingError::RequestFailed(format!("HTTP {status}: {message}"))
    }
}

#[async_trait]
impl RoutingClient for OpenRouteServiceClient {
    #[instrument(skip(self, request), fields(profile = request.profile.ors_name()))]
    async fn directions(&self, request: &DirectionsRequest) -> Result<Directions, RoutingError> {
        let profile = request.profile.ors_name();
        let url = format!(
            "{}/v2/directions/{profile}/geojson",
            self.config.base_url.trim_end_matches('/')
        );
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        debug!(?url, preference = ?request.preference, "Requesting directions");

        let response = self
            .client
            .post(&url)
            .header("Authorization", api_key)
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(|e| RoutingError::from_transport(&e, self.config.timeout_secs))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::ParseError(e.to_string()))?;

        if !status.is_success() {
            let err = Self::classify_error(status, &body, profile);
            warn!(%status, error = %err, "Directions request rejected");
            return Err(err);
        }

        let directions = Self::parse_directions_response(&body, profile)?;
        debug!(
            distance_m = directions.distance_m,
            duration_s = directions.duration_s,
            points = directions.coordinates.len(),
            "Directions received"
        );
        Ok(directions)
    }

    fn provider_name(&self) -> &'static str {
        "openrouteservice"
    }
}

// --- Raw API types ---

#[derive(Debug, Serialize)]
struct OrsDirectionsBody {
    coordinates: Vec<[f64; 2]>,
    preference: Preference,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OrsOptions>,
}

#[derive(Debug, Serialize)]
struct OrsOptions {
    avoid_features: Vec<AvoidFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeatureCollection {
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    geometry: RawLineString,
    properties: RawProperties,
}

#[derive(Debug, Deserialize)]
struct RawLineString {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    #[serde(default)]
    summary: RawSummary,
}

// ORS omits zero-valued summary fields
#[derive(Debug, Default, Deserialize)]
struct RawSummary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct RawErrorResponse {
    error: RawErrorBody,
}

#[derive(Debug, Deserialize)]
struct RawErrorBody {
    code: Option<u32>,
    message: Option<String>,
}
