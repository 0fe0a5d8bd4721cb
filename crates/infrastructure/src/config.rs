//! Application configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `greenroute.toml`, then `GREENROUTE_*` environment variables using `__`
//! between nested keys (e.g. `GREENROUTE_ROUTING__API_KEY`).

use std::path::Path;
use std::time::Duration;

use application::services::RoutePolicyConfig;
use integration_routing::{EmissionsConfig, NominatimConfig, RoutingConfig};
use serde::{Deserialize, Serialize};

use crate::telemetry::TelemetryConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "GREENROUTE";

/// Default configuration file name (extension resolved by `config`)
pub const DEFAULT_CONFIG_FILE: &str = "greenroute";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Geocoding service
    #[serde(default)]
    pub nominatim: NominatimConfig,

    /// Directions service
    #[serde(default)]
    pub routing: RoutingConfig,

    /// CO₂ estimation backend; an empty `base_url` without fallbacks disables it
    #[serde(default)]
    pub emissions: EmissionsConfig,

    /// Route planning, caching and suggestion tunables
    #[serde(default)]
    pub policy: RoutePolicyConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `greenroute.toml` (if present) and environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
    }

    /// Load configuration from a specific file, then environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or a source cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path.as_ref()).required(true))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let builder = config::Config::builder()
            .add_source(file)
            // Override with environment variables (e.g., GREENROUTE_POLICY__DEBOUNCE_MS)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("emissions.fallback_base_urls")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Whether the emissions backend is configured
    #[must_use]
    pub fn emissions_enabled(&self) -> bool {
        !self.emissions.candidate_urls().is_empty()
    }

    /// Upper bound for one emissions estimate across all deployments
    #[must_use]
    pub fn emissions_budget(&self) -> Duration {
        let deployments = u32::try_from(self.emissions.candidate_urls().len())
            .unwrap_or(u32::MAX)
            .max(1);
        Duration::from_secs(self.emissions.timeout_secs).saturating_mul(deployments)
    }

    /// Validate all sections
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid section.
    pub fn validate(&self) -> Result<(), String> {
        if self.nominatim.base_url.trim().is_empty() {
            return Err("nominatim.base_url is required".to_string());
        }
        if self.nominatim.user_agent.trim().is_empty() {
            return Err("nominatim.user_agent is required by the Nominatim usage policy".to_string());
        }
        self.routing
            .validate()
            .map_err(|e| format!("routing: {e}"))?;
        if self.emissions_enabled() {
            self.emissions
                .validate()
                .map_err(|e| format!("emissions: {e}"))?;
        }
        self.policy.validate().map_err(|e| format!("policy: {e}"))?;
        Ok(())
    }
}
