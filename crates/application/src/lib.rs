//! Application layer - Use cases and orchestration
//!
//! Port definitions for the external services and the route lookup use cases:
//! geocoding with suggestions, concurrent route fetching, session state and
//! presentation.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
