//! Domain layer for GreenRoute
//!
//! Coordinates, routing profiles, route results and the lookup session.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
