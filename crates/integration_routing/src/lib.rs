//! Routing integration for GreenRoute
//!
//! HTTP clients for the external services behind the route lookup:
//!
//! - directions from [OpenRouteService](https://openrouteservice.org) ([`OpenRouteServiceClient`])
//!   or an [OSRM](https://project-osrm.org) server ([`OsrmRoutingClient`]),
//! - place search via [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org)
//!   ([`NominatimGeocodingClient`]),
//! - the CO₂ estimation backend ([`HttpEmissionsClient`]).
//!
//! # Architecture
//!
//! Every service sits behind a client trait ([`RoutingClient`], [`GeocodingClient`],
//! [`EmissionsClient`]) so the infrastructure adapters can swap providers.
//! These clients do no caching; caches live in the application services.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_routing::{DirectionsRequest, OpenRouteServiceClient, RoutingClient, RoutingConfig};
//!
//! let client = OpenRouteServiceClient::new(&RoutingConfig::default())?;
//! let directions = client
//!     .directions(&DirectionsRequest::fastest_by_car((41.3869, 2.1701), (41.4036, 2.1744)))
//!     .await?;
//! ```

mod client;
mod config;
mod emissions;
mod error;
mod geocoding;
mod models;
mod osrm;

pub use client::{OpenRouteServiceClient, RoutingClient};
pub use config::{RoutingConfig, RoutingProvider};
pub use emissions::{EmissionsClient, EmissionsConfig, EmissionsError, HttpEmissionsClient};
pub use error::RoutingError;
pub use geocoding::{GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient};
pub use models::{
    AvoidFeature, Directions, DirectionsRequest, EmissionsQuery, EmissionsReply, GeocodedPlace,
    Preference, RoutingProfile, Waypoint,
};
pub use osrm::OsrmRoutingClient;
