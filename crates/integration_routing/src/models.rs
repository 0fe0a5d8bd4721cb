//! Request and response models shared by the routing clients

use serde::{Deserialize, Serialize};

/// A point as sent to / received from the services (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
}

impl Waypoint {
    /// Create a waypoint
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `[lon, lat]` order used by GeoJSON and both routing APIs
    #[must_use]
    pub const fn lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl From<(f64, f64)> for Waypoint {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Vehicle profile of the routing service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingProfile {
    /// Car
    DrivingCar,
    /// Regular bicycle
    CyclingRegular,
    /// Pedestrian
    FootWalking,
}

impl RoutingProfile {
    /// OpenRouteService profile path segment
    #[must_use]
    pub const fn ors_name(&self) -> &'static str {
        match self {
            Self::DrivingCar => "driving-car",
            Self::CyclingRegular => "cycling-regular",
            Self::FootWalking => "foot-walking",
        }
    }

    /// OSRM profile path segment
    #[must_use]
    pub const fn osrm_name(&self) -> &'static str {
        match self {
            Self::DrivingCar => "driving",
            Self::CyclingRegular => "cycling",
            Self::FootWalking => "foot",
        }
    }
}

/// Optimization criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    /// Minimize time
    Fastest,
    /// Minimize distance
    Shortest,
}

/// Road features a route may avoid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvoidFeature {
    /// Motorways
    Highways,
    /// Toll roads
    Tollways,
}

impl AvoidFeature {
    /// OSRM road class excluded for this feature
    #[must_use]
    pub const fn osrm_class(&self) -> &'static str {
        match self {
            Self::Highways => "motorway",
            Self::Tollways => "toll",
        }
    }
}

/// A directions request between two points
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    /// Start point
    pub from: Waypoint,
    /// End point
    pub to: Waypoint,
    /// Vehicle profile
    pub profile: RoutingProfile,
    /// Optimization criterion
    pub preference: Preference,
    /// Features to avoid
    pub avoid: Vec<AvoidFeature>,
}

impl DirectionsRequest {
    /// Create a request with no avoided features
    #[must_use]
    pub fn new(
        from: impl Into<Waypoint>,
        to: impl Into<Waypoint>,
        profile: RoutingProfile,
        preference: Preference,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            profile,
            preference,
            avoid: Vec::new(),
        }
    }

    /// Fastest car route
    #[must_use]
    pub fn fastest_by_car(from: impl Into<Waypoint>, to: impl Into<Waypoint>) -> Self {
        Self::new(from, to, RoutingProfile::DrivingCar, Preference::Fastest)
    }

    /// Add features to avoid
    #[must_use]
    pub fn avoiding(mut self, features: &[AvoidFeature]) -> Self {
        self.avoid.extend_from_slice(features);
        self
    }
}

/// A resolved route
#[derive(Debug, Clone, PartialEq)]
pub struct Directions {
    /// Route polyline
    pub coordinates: Vec<Waypoint>,
    /// Total distance in meters
    pub distance_m: f64,
    /// Total duration in seconds
    pub duration_s: f64,
}

/// A Nominatim search hit
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    /// Full display name
    pub display_name: String,
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
}

/// Body of the emissions backend request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsQuery {
    /// Origin latitude
    pub start_lat: f64,
    /// Origin longitude
    pub start_lon: f64,
    /// Destination latitude
    pub end_lat: f64,
    /// Destination longitude
    pub end_lon: f64,
    /// Selected profile ("eco" / "fast")
    pub mode: String,
}

/// Emissions backend response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsReply {
    /// Estimated CO₂ in grams
    pub co2_estimated_g: f64,
    /// Recommendation text
    #[serde(default)]
    pub recommendation: String,
}
