//! Route lookup session

use serde::{Deserialize, Serialize};

use crate::entities::{RoutePair, RouteResult};
use crate::value_objects::{Coordinate, RouteProfile};

/// Result of the last successful calculation
///
/// Origin, destination and both routes always belong together; only the
/// selected profile may change without a new calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    origin: Coordinate,
    destination: Coordinate,
    routes: RoutePair,
    selected_profile: RouteProfile,
}

impl Session {
    /// Create a session from a fully resolved calculation
    #[must_use]
    pub const fn new(
        origin: Coordinate,
        destination: Coordinate,
        routes: RoutePair,
        selected_profile: RouteProfile,
    ) -> Self {
        Self {
            origin,
            destination,
            routes,
            selected_profile,
        }
    }

    /// Resolved origin
    #[must_use]
    pub const fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Resolved destination
    #[must_use]
    pub const fn destination(&self) -> Coordinate {
        self.destination
    }

    /// Both routes
    #[must_use]
    pub const fn routes(&self) -> &RoutePair {
        &self.routes
    }

    /// Currently selected profile
    #[must_use]
    pub const fn selected_profile(&self) -> RouteProfile {
        self.selected_profile
    }

    /// Route for the selected profile
    #[must_use]
    pub const fn selected_route(&self) -> &RouteResult {
        self.routes.get(self.selected_profile)
    }

    /// Route for the other profile
    #[must_use]
    pub const fn alternate_route(&self) -> &RouteResult {
        self.routes.get(self.selected_profile.alternate())
    }

    /// Change the selected profile
    pub fn select(&mut self, profile: RouteProfile) {
        self.selected_profile = profile;
    }

    /// Whether this session was computed for the given endpoints
    #[must_use]
    pub fn matches(&self, origin: &Coordinate, destination: &Coordinate) -> bool {
        self.origin.key() == origin.key() && self.destination.key() == destination.key()
    }
}
