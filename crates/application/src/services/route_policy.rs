//! Route profile policy
//!
//! Maps a [`RouteProfile`] and a pair of endpoints to the ordered chain of
//! routing requests that the fetcher tries.

use std::time::Duration;

use domain::value_objects::{Coordinate, RoutePreference, RouteProfile, TravelMode};
use serde::{Deserialize, Serialize};

use crate::ports::RouteRequest;

/// Upper bound for `max_fallbacks`
pub const MAX_FALLBACKS_LIMIT: usize = 2;

/// Tunables for route planning, caching and suggestions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePolicyConfig {
    /// Eco trips up to this straight-line distance are planned by bike
    #[serde(default = "default_eco_cycling_max_km")]
    pub eco_cycling_max_km: f64,

    /// Extra requests tried after a "no route" answer (clamped to 2)
    #[serde(default = "default_max_fallbacks")]
    pub max_fallbacks: usize,

    /// Lifetime of geocoding and route cache entries in seconds (0 disables)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum number of geocoding candidates kept
    #[serde(default = "default_max_candidates")]
    pub max_candidates: u8,

    /// Quiet period before a suggestion lookup is sent
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

const fn default_eco_cycling_max_km() -> f64 {
    25.0
}

const fn default_max_fallbacks() -> usize {
    1
}

const fn default_cache_ttl_secs() -> u64 {
    1800
}

const fn default_max_candidates() -> u8 {
    5
}

const fn default_debounce_ms() -> u64 {
    300
}

impl Default for RoutePolicyConfig {
    fn default() -> Self {
        Self {
            eco_cycling_max_km: default_eco_cycling_max_km(),
            max_fallbacks: default_max_fallbacks(),
            cache_ttl_secs: default_cache_ttl_secs(),
            max_candidates: default_max_candidates(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl RoutePolicyConfig {
    /// Create a configuration suitable for testing (no debounce)
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            debounce_ms: 0,
            ..Default::default()
        }
    }

    /// Cache time-to-live, `None` when caching is disabled
    #[must_use]
    pub const fn cache_ttl(&self) -> Option<Duration> {
        if self.cache_ttl_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.cache_ttl_secs))
        }
    }

    /// Debounce interval
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.eco_cycling_max_km.is_finite() || self.eco_cycling_max_km < 0.0 {
            return Err("eco_cycling_max_km must be a non-negative number".to_string());
        }
        if self.max_candidates == 0 {
            return Err("max_candidates must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Turns a profile into routing requests
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    eco_cycling_max_km: f64,
    max_fallbacks: usize,
}

impl RoutePolicy {
    /// Create a policy from configuration
    #[must_use]
    pub fn new(config: &RoutePolicyConfig) -> Self {
        Self {
            eco_cycling_max_km: config.eco_cycling_max_km,
            max_fallbacks: config.max_fallbacks.min(MAX_FALLBACKS_LIMIT),
        }
    }

    /// Ordered request chain for a profile
    ///
    /// The first entry is the primary request; the rest are tried only when
    /// the routing service reports that no route exists.
    #[must_use]
    pub fn plan(
        &self,
        profile: RouteProfile,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Vec<RouteRequest> {
        match profile {
            RouteProfile::Fast => vec![RouteRequest::new(
                origin,
                destination,
                TravelMode::Driving,
                RoutePreference::Fastest,
            )],
            RouteProfile::Eco => self
                .eco_modes(origin.distance_km(&destination))
                .into_iter()
                .take(1 + self.max_fallbacks)
                .map(|mode| {
                    RouteRequest::new(origin, destination, mode, RoutePreference::Shortest)
                        .avoiding_motorways()
                })
                .collect(),
        }
    }

    fn eco_modes(&self, straight_line_km: f64) -> Vec<TravelMode> {
        let primary = if straight_line_km <= self.eco_cycling_max_km {
            TravelMode::Cycling
        } else {
            TravelMode::Driving
        };

        let mut modes = vec![primary];
        for fallback in [TravelMode::Walking, TravelMode::Driving] {
            if !modes.contains(&fallback) {
                modes.push(fallback);
            }
        }
        modes
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::new(&RoutePolicyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn barcelona() -> (Coordinate, Coordinate) {
        (
            Coordinate::new(41.3869, 2.1701).unwrap(),
            Coordinate::new(41.4036, 2.1744).unwrap(),
        )
    }

    fn barcelona_to_girona() -> (Coordinate, Coordinate) {
        (
            Coordinate::new(41.3869, 2.1701).unwrap(),
            Coordinate::new(41.9794, 2.8214).unwrap(),
        )
    }

    #[test]
    fn test_fast_has_no_fallback() {
        let (a, b) = barcelona();
        let config = RoutePolicyConfig {
            max_fallbacks: 2,
            ..Default::default()
        };
        let chain = RoutePolicy::new(&config).plan(RouteProfile::Fast, a, b);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].travel_mode, TravelMode::Driving);
        assert_eq!(chain[0].preference, RoutePreference::Fastest);
        assert!(!chain[0].avoid_motorways);
    }

    #[test]
    fn test_short_eco_trip_cycles() {
        let (a, b) = barcelona();
        let chain = RoutePolicy::default().plan(RouteProfile::Eco, a, b);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].travel_mode, TravelMode::Cycling);
        assert_eq!(chain[1].travel_mode, TravelMode::Walking);
        assert!(chain.iter().all(|r| r.avoid_motorways));
        assert!(chain.iter().all(|r| r.preference == RoutePreference::Shortest));
    }

    #[test]
    fn test_long_eco_trip_drives() {
        let (a, b) = barcelona_to_girona();
        let config = RoutePolicyConfig {
            max_fallbacks: 2,
            ..Default::default()
        };
        let chain = RoutePolicy::new(&config).plan(RouteProfile::Eco, a, b);
        let modes: Vec<_> = chain.iter().map(|r| r.travel_mode).collect();
        assert_eq!(modes, vec![TravelMode::Driving, TravelMode::Walking]);
    }

    #[test]
    fn test_fallbacks_are_clamped() {
        let (a, b) = barcelona();
        let config = RoutePolicyConfig {
            max_fallbacks: 10,
            ..Default::default()
        };
        let chain = RoutePolicy::new(&config).plan(RouteProfile::Eco, a, b);
        assert_eq!(chain.len(), 1 + MAX_FALLBACKS_LIMIT);
    }

    #[test]
    fn test_no_fallbacks() {
        let (a, b) = barcelona();
        let config = RoutePolicyConfig {
            max_fallbacks: 0,
            ..Default::default()
        };
        assert_eq!(RoutePolicy::new(&config).plan(RouteProfile::Eco, a, b).len(), 1);
    }

    #[test]
    fn test_config_defaults() {
        let config = RoutePolicyConfig::default();
        assert!((config.eco_cycling_max_km - 25.0).abs() < f64::EPSILON);
        assert_eq!(config.cache_ttl(), Some(Duration::from_secs(1800)));
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.max_candidates, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let config = RoutePolicyConfig {
            cache_ttl_secs: 0,
            ..Default::default()
        };
        assert!(config.cache_ttl().is_none());
    }

    #[test]
    fn test_validation() {
        let config = RoutePolicyConfig {
            max_candidates: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RoutePolicyConfig {
            eco_cycling_max_km: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
