//! OSRM route service client
//!
//! Uses the `route/v1` endpoint with GeoJSON geometries. OSRM has no
//! preference switch, so it is ignored. Avoided features become the `exclude`
//! parameter on the driving profile, which must be built with the `motorway`
//! and `toll` classes. A server that rejects them answers `InvalidValue`,
//! surfaced as [`RoutingError::ExcludeUnsupported`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::client::RoutingClient;
use crate::config::RoutingConfig;
use crate::error::RoutingError;
use crate::models::{Directions, DirectionsRequest, RoutingProfile, Waypoint};

/// OSRM-based directions client
#[derive(Debug)]
pub struct OsrmRoutingClient {
    client: Client,
    config: RoutingConfig,
}

impl OsrmRoutingClient {
    /// Create a new OSRM client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
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

    fn route_url(&self, request: &DirectionsRequest) -> String {
        let [from_lon, from_lat] = request.from.lon_lat();
        let [to_lon, to_lat] = request.to.lon_lat();
        format!(
            "{}/route/v1/{}/{from_lon},{from_lat};{to_lon},{to_lat}",
            self.config.base_url.trim_end_matches('/'),
            request.profile.osrm_name(),
        )
    }

    /// `exclude` value for the request, if any
    ///
    /// Only the car profile carries motorway and toll classes; the bike and
    /// foot profiles never use motorways anyway.
    fn exclude_param(request: &DirectionsRequest) -> Option<String> {
        if request.profile != RoutingProfile::DrivingCar || request.avoid.is_empty() {
            return None;
        }
        let mut classes: Vec<&str> = request.avoid.iter().map(|f| f.osrm_class()).collect();
        classes.dedup();
        Some(classes.join(","))
    }

    /// Parse an OSRM route response (any status)
    fn parse_route_response(
        body: &str,
        profile: &str,
        exclude: Option<&str>,
    ) -> Result<Directions, RoutingError> {
        let raw: RawRouteResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

        if raw.code != "Ok" {
            let reason = raw.message.unwrap_or_else(|| raw.code.clone());
            return match (raw.code.as_str(), exclude) {
                ("NoRoute" | "NoSegment", _) => Err(RoutingError::NoRouteFound {
                    profile: profile.to_string(),
                    reason,
                }),
                ("InvalidValue", Some(classes)) => Err(RoutingError::ExcludeUnsupported {
                    classes: classes.to_string(),
                    reason,
                }),
                _ => Err(RoutingError::RequestFailed(format!("{}: {reason}", raw.code))),
            };
        }

        let route = raw
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::NoRouteFound {
                profile: profile.to_string(),
                reason: "response contained no routes".to_string(),
            })?;

        Ok(Directions {
            coordinates: route
                .geometry
                .coordinates
                .into_iter()
                .map(|[lon, lat]| Waypoint::new(lat, lon))
                .collect(),
            distance_m: route.distance,
            duration_s: route.duration,
        })
    }
}

#[async_trait]
impl RoutingClient for OsrmRoutingClient {
    #[instrument(skip(self, request), fields(profile = request.profile.osrm_name()))]
    async fn directions(&self, request: &DirectionsRequest) -> Result<Directions, RoutingError> {
        let profile = request.profile.osrm_name();
        let url = self.route_url(request);
        let exclude = Self::exclude_param(request);
        let mut params = vec![
            ("overview", "full"),
            ("geometries", "geojson"),
            ("alternatives", "false"),
        ];
        if let Some(classes) = exclude.as_deref() {
            params.push(("exclude", classes));
        }

        debug!(?url, ?exclude, "Requesting directions");

        let response = self
            .client
            .get(&url)
            .query(&params)
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
        if status.is_server_error() {
            return Err(RoutingError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::ParseError(e.to_string()))?;

        // OSRM reports NoRoute with HTTP 400 and a JSON body
        Self::parse_route_response(&body, profile, exclude.as_deref()).inspect_err(|e| {
            warn!(%status, error = %e, "Directions request rejected");
        })
    }

    fn provider_name(&self) -> &'static str {
        "osrm"
    }
}

#[derive(Debug, Deserialize)]
struct RawRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    geometry: RawGeometry,
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    coordinates: Vec<[f64; 2]>,
}
