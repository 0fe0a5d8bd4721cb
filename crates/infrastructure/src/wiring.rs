//! Construction of a ready-to-use [`RouteLookupClient`] from configuration

use std::sync::Arc;

use application::error::ApplicationError;
use application::services::RouteLookupClient;
use integration_routing::{
    HttpEmissionsClient, NominatimGeocodingClient, OpenRouteServiceClient, OsrmRoutingClient,
    RoutingClient, RoutingProvider,
};
use tracing::info;

use crate::adapters::{EmissionsAdapter, GeocodingAdapter, RoutingAdapter};
use crate::config::AppConfig;

fn configuration_error(e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Configuration(e.to_string())
}

/// Build a route lookup client with HTTP adapters for every port
///
/// # Errors
///
/// Returns `Configuration` if the configuration is invalid or an HTTP client
/// cannot be created.
pub fn build_route_lookup_client(config: &AppConfig) -> Result<RouteLookupClient, ApplicationError> {
    config.validate().map_err(ApplicationError::Configuration)?;

    let geocoding = GeocodingAdapter::new(
        NominatimGeocodingClient::new(&config.nominatim).map_err(configuration_error)?,
    );

    let directions: Box<dyn RoutingClient> = match config.routing.provider {
        RoutingProvider::OpenRouteService => {
            Box::new(OpenRouteServiceClient::new(&config.routing).map_err(configuration_error)?)
        },
        RoutingProvider::Osrm => {
            Box::new(OsrmRoutingClient::new(&config.routing).map_err(configuration_error)?)
        },
    };
    let routing = RoutingAdapter::from_boxed(directions);

    let mut client = RouteLookupClient::new(Arc::new(geocoding), Arc::new(routing), &config.policy);

    if config.emissions_enabled() {
        let emissions = EmissionsAdapter::new(
            HttpEmissionsClient::new(&config.emissions).map_err(configuration_error)?,
        );
        client = client.with_emissions(Arc::new(emissions), config.emissions_budget());
    }

    info!(
        provider = %config.routing.provider,
        emissions = config.emissions_enabled(),
        "Route lookup client ready"
    );
    Ok(client)
}
