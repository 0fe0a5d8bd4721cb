//! Routing service configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which directions API backs the routing client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingProvider {
    /// OpenRouteService v2 directions (POST, API key)
    #[default]
    OpenRouteService,
    /// OSRM route service (GET, no key)
    Osrm,
}

impl fmt::Display for RoutingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenRouteService => write!(f, "openrouteservice"),
            Self::Osrm => write!(f, "osrm"),
        }
    }
}

impl FromStr for RoutingProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openrouteservice" | "ors" => Ok(Self::OpenRouteService),
            "osrm" => Ok(Self::Osrm),
            _ => Err(format!(
                "Invalid routing provider: {s}. Use 'openrouteservice' or 'osrm'"
            )),
        }
    }
}

/// Configuration for the directions service
#[derive(Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Directions provider
    #[serde(default)]
    pub provider: RoutingProvider,

    /// Base URL of the provider API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (sent as `Authorization` header to OpenRouteService)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for RoutingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://api.openrouteservice.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            provider: RoutingProvider::default(),
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RoutingConfig {
    /// Configuration for a public OSRM server
    #[must_use]
    pub fn osrm(base_url: impl Into<String>) -> Self {
        Self {
            provider: RoutingProvider::Osrm,
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: Some("test-key".to_string()),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.provider == RoutingProvider::OpenRouteService
            && self.api_key.as_deref().is_none_or(str::is_empty)
        {
            return Err("api_key is required for openrouteservice".to_string());
        }

        Ok(())
    }
}
