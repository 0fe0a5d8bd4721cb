//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod emissions_port;
mod geocoding_port;
mod map_surface_port;
mod routing_port;

#[cfg(test)]
pub use emissions_port::MockEmissionsPort;
pub use emissions_port::{EmissionsPort, EmissionsRequest};
#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::GeocodingPort;
#[cfg(test)]
pub use map_surface_port::MockMapSurface;
pub use map_surface_port::{GeoBounds, MapSurface, MarkerKind, RouteEmphasis, RouteStyle};
#[cfg(test)]
pub use routing_port::MockRoutingPort;
pub use routing_port::{RouteRequest, RoutedPath, RoutingPort};
