//! Routing profiles and the travel modes they map to

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// User-facing routing preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteProfile {
    /// Non-motorway, distance-biased routing
    #[default]
    Eco,
    /// Shortest-time driving
    Fast,
}

impl RouteProfile {
    /// Both profiles, in commit order
    pub const ALL: [Self; 2] = [Self::Eco, Self::Fast];

    /// Wire name ("eco" / "fast")
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eco => "eco",
            Self::Fast => "fast",
        }
    }

    /// The other profile of the pair
    #[must_use]
    pub const fn alternate(&self) -> Self {
        match self {
            Self::Eco => Self::Fast,
            Self::Fast => Self::Eco,
        }
    }
}

impl fmt::Display for RouteProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteProfile {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eco" => Ok(Self::Eco),
            "fast" | "rapida" | "ràpida" => Ok(Self::Fast),
            other => Err(DomainError::InvalidProfile(other.to_string())),
        }
    }
}

/// Travel mode requested from the routing service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    /// Car
    Driving,
    /// Bicycle
    Cycling,
    /// On foot
    Walking,
}

impl TravelMode {
    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Driving => "Car",
            Self::Cycling => "Bike",
            Self::Walking => "Walk",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Optimization criterion sent with a route request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutePreference {
    /// Minimize travel time
    Fastest,
    /// Minimize distance
    Shortest,
}
