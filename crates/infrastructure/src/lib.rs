//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports with the HTTP clients from
//! `integration_routing`, provides a GeoJSON map surface, configuration
//! loading and tracing setup.

pub mod adapters;
pub mod config;
pub mod telemetry;
pub mod wiring;

pub use adapters::*;
pub use config::AppConfig;
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_tracing};
pub use wiring::build_route_lookup_client;
