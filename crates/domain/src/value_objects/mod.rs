//! Value Objects - Immutable, identity-less domain primitives

mod coordinate;
mod route_profile;

pub use coordinate::{Coordinate, CoordinateKey};
pub use route_profile::{RouteProfile, RoutePreference, TravelMode};
