//! Domain entities

mod emissions;
mod place;
mod route;
mod session;

pub use emissions::EmissionsEstimate;
pub use place::{PlaceCandidate, PlaceInput};
pub use route::{RoutePair, RouteResult, meters_to_km, seconds_to_minutes};
pub use session::Session;
