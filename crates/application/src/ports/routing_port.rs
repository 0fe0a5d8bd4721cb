//! Routing service port
//!
//! Defines the interface for fetching a single route geometry. Adapters in
//! the infrastructure layer implement this port on top of directions APIs.

use async_trait::async_trait;
use domain::value_objects::{Coordinate, RoutePreference, TravelMode};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// One request to the routing service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    /// Start point
    pub origin: Coordinate,
    /// End point
    pub destination: Coordinate,
    /// Vehicle / travel mode
    pub travel_mode: TravelMode,
    /// Optimization criterion
    pub preference: RoutePreference,
    /// Avoid motorways and toll roads
    pub avoid_motorways: bool,
}

impl RouteRequest {
    /// Create a request without avoided features
    #[must_use]
    pub const fn new(
        origin: Coordinate,
        destination: Coordinate,
        travel_mode: TravelMode,
        preference: RoutePreference,
    ) -> Self {
        Self {
            origin,
            destination,
            travel_mode,
            preference,
            avoid_motorways: false,
        }
    }

    /// Avoid motorways and toll roads
    #[must_use]
    pub const fn avoiding_motorways(mut self) -> Self {
        self.avoid_motorways = true;
        self
    }
}

/// Geometry and totals of a routed path
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedPath {
    /// Ordered polyline
    pub geometry: Vec<Coordinate>,
    /// Total distance in meters
    pub distance_meters: f64,
    /// Total duration in seconds
    pub duration_seconds: f64,
}

/// Port for route lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// Fetch a route
    ///
    /// Fails with `RouteNotFound` when the service has no route and with
    /// `ServiceUnavailable` on transport or HTTP failure.
    async fn route(&self, request: &RouteRequest) -> Result<RoutedPath, ApplicationError>;
}
