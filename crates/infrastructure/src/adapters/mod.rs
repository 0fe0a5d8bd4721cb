//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod emissions_adapter;
mod geocoding_adapter;
mod geojson_surface;
mod routing_adapter;

pub use emissions_adapter::EmissionsAdapter;
pub use geocoding_adapter::GeocodingAdapter;
pub use geojson_surface::GeoJsonMapSurface;
pub use routing_adapter::RoutingAdapter;
