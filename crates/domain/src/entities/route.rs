//! Route results as returned by the routing service

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{Coordinate, RouteProfile, TravelMode};

/// A fetched route for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    geometry: Vec<Coordinate>,
    distance_meters: f64,
    duration_seconds: f64,
    profile: RouteProfile,
    travel_mode: TravelMode,
}

impl RouteResult {
    /// Create a route result
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the geometry is empty or
    /// distance/duration are negative or not finite.
    pub fn new(
        geometry: Vec<Coordinate>,
        distance_meters: f64,
        duration_seconds: f64,
        profile: RouteProfile,
        travel_mode: TravelMode,
    ) -> Result<Self, DomainError> {
        if geometry.is_empty() {
            return Err(DomainError::ValidationError(
                "route geometry must not be empty".to_string(),
            ));
        }
        if !distance_meters.is_finite() || distance_meters < 0.0 {
            return Err(DomainError::ValidationError(format!(
                "invalid route distance: {distance_meters}"
            )));
        }
        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return Err(DomainError::ValidationError(format!(
                "invalid route duration: {duration_seconds}"
            )));
        }
        Ok(Self {
            geometry,
            distance_meters,
            duration_seconds,
            profile,
            travel_mode,
        })
    }

    /// Ordered polyline of the route
    #[must_use]
    pub fn geometry(&self) -> &[Coordinate] {
        &self.geometry
    }

    /// Total distance in meters
    #[must_use]
    pub const fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    /// Total duration in seconds
    #[must_use]
    pub const fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Profile this route was fetched for
    #[must_use]
    pub const fn profile(&self) -> RouteProfile {
        self.profile
    }

    /// Travel mode the routing service actually used
    #[must_use]
    pub const fn travel_mode(&self) -> TravelMode {
        self.travel_mode
    }

    /// Distance in kilometers, rounded to two decimals
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        meters_to_km(self.distance_meters)
    }

    /// Duration in whole minutes, rounded
    #[must_use]
    pub fn duration_minutes(&self) -> u64 {
        seconds_to_minutes(self.duration_seconds)
    }
}

/// `round(m / 1000, 2)`
#[must_use]
pub fn meters_to_km(meters: f64) -> f64 {
    (meters / 10.0).round() / 100.0
}

/// `round(s / 60)`
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // non-negative, validated
pub fn seconds_to_minutes(seconds: f64) -> u64 {
    (seconds / 60.0).round().max(0.0) as u64
}

/// Both profiles resolved for the same origin/destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePair {
    eco: RouteResult,
    fast: RouteResult,
}

impl RoutePair {
    /// Pair an eco and a fast route
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ProfileMismatch` if a route sits in the wrong slot.
    pub fn new(eco: RouteResult, fast: RouteResult) -> Result<Self, DomainError> {
        if eco.profile != RouteProfile::Eco {
            return Err(DomainError::ProfileMismatch {
                expected: RouteProfile::Eco,
                actual: eco.profile,
            });
        }
        if fast.profile != RouteProfile::Fast {
            return Err(DomainError::ProfileMismatch {
                expected: RouteProfile::Fast,
                actual: fast.profile,
            });
        }
        Ok(Self { eco, fast })
    }

    /// Route for a profile
    #[must_use]
    pub const fn get(&self, profile: RouteProfile) -> &RouteResult {
        match profile {
            RouteProfile::Eco => &self.eco,
            RouteProfile::Fast => &self.fast,
        }
    }

    /// Eco route
    #[must_use]
    pub const fn eco(&self) -> &RouteResult {
        &self.eco
    }

    /// Fast route
    #[must_use]
    pub const fn fast(&self) -> &RouteResult {
        &self.fast
    }
}
