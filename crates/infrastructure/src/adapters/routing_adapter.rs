//! Routing adapter - Implements RoutingPort using integration_routing

use application::error::ApplicationError;
use application::ports::{RouteRequest, RoutedPath, RoutingPort};
use async_trait::async_trait;
use domain::value_objects::{Coordinate, RoutePreference, TravelMode};
use integration_routing::{
    AvoidFeature, Directions, DirectionsRequest, Preference, RoutingClient, RoutingError,
    RoutingProfile,
};
use tracing::{debug, instrument, warn};

/// Adapter for route lookups through a directions client (ORS or OSRM)
pub struct RoutingAdapter {
    client: Box<dyn RoutingClient>,
}

impl std::fmt::Debug for RoutingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingAdapter")
            .field("provider", &self.client.provider_name())
            .finish()
    }
}

impl RoutingAdapter {
    /// Create a new routing adapter
    pub fn new(client: impl RoutingClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }

    /// Create an adapter from an already boxed client
    pub fn from_boxed(client: Box<dyn RoutingClient>) -> Self {
        Self { client }
    }

    const fn convert_mode(mode: TravelMode) -> RoutingProfile {
        match mode {
            TravelMode::Driving => RoutingProfile::DrivingCar,
            TravelMode::Cycling => RoutingProfile::CyclingRegular,
            TravelMode::Walking => RoutingProfile::FootWalking,
        }
    }

    const fn convert_preference(preference: RoutePreference) -> Preference {
        match preference {
            RoutePreference::Fastest => Preference::Fastest,
            RoutePreference::Shortest => Preference::Shortest,
        }
    }

    fn build_request(request: &RouteRequest) -> DirectionsRequest {
        let directions = DirectionsRequest::new(
            (request.origin.latitude(), request.origin.longitude()),
            (request.destination.latitude(), request.destination.longitude()),
            Self::convert_mode(request.travel_mode),
            Self::convert_preference(request.preference),
        );
        if request.avoid_motorways {
            directions.avoiding(&[AvoidFeature::Highways, AvoidFeature::Tollways])
        } else {
            directions
        }
    }

    /// Convert directions, dropping points with invalid coordinates
    fn convert_directions(directions: Directions) -> RoutedPath {
        let total = directions.coordinates.len();
        let geometry: Vec<Coordinate> = directions
            .coordinates
            .into_iter()
            .filter_map(|w| Coordinate::new(w.latitude, w.longitude).ok())
            .collect();
        if geometry.len() < total {
            warn!(dropped = total - geometry.len(), "Dropped invalid route points");
        }

        RoutedPath {
            geometry,
            distance_meters: directions.distance_m,
            duration_seconds: directions.duration_s,
        }
    }

    fn map_error(err: RoutingError) -> ApplicationError {
        match err {
            RoutingError::NoRouteFound { profile, reason } => {
                ApplicationError::RouteNotFound(format!("{profile}: {reason}"))
            },
            RoutingError::ConfigurationError(msg) => ApplicationError::Configuration(msg),
            other => ApplicationError::ServiceUnavailable(format!("Routing failed: {other}")),
        }
    }
}

#[async_trait]
impl RoutingPort for RoutingAdapter {
    #[instrument(skip(self, request), fields(mode = %request.travel_mode, provider = self.client.provider_name()))]
    async fn route(&self, request: &RouteRequest) -> Result<RoutedPath, ApplicationError> {
        let directions = self
            .client
            .directions(&Self::build_request(request))
            .await
            .map_err(Self::map_error)?;

        let path = Self::convert_directions(directions);
        debug!(points = path.geometry.len(), "Route converted");
        Ok(path)
    }
}
