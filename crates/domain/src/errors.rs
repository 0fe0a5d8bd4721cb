//! Domain-level errors

use thiserror::Error;

use crate::value_objects::RouteProfile;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinates outside the WGS84 range or not finite
    #[error("Invalid coordinates: ({latitude}, {longitude})")]
    InvalidCoordinates {
        /// Rejected latitude
        latitude: f64,
        /// Rejected longitude
        longitude: f64,
    },

    /// Unknown routing profile name
    #[error("Invalid route profile: {0}")]
    InvalidProfile(String),

    /// A route was placed under the wrong profile
    #[error("Expected a {expected} route, got {actual}")]
    ProfileMismatch {
        /// Profile of the slot
        expected: RouteProfile,
        /// Profile of the route
        actual: RouteProfile,
    },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_coordinates_message() {
        let err = DomainError::InvalidCoordinates {
            latitude: 91.0,
            longitude: 2.0,
        };
        assert_eq!(err.to_string(), "Invalid coordinates: (91, 2)");
    }

    #[test]
    fn invalid_profile_message() {
        let err = DomainError::InvalidProfile("scenic".to_string());
        assert_eq!(err.to_string(), "Invalid route profile: scenic");
    }

    #[test]
    fn profile_mismatch_message() {
        let err = DomainError::ProfileMismatch {
            expected: RouteProfile::Eco,
            actual: RouteProfile::Fast,
        };
        assert_eq!(err.to_string(), "Expected a eco route, got fast");
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("geometry is empty".to_string());
        assert_eq!(err.to_string(), "Validation failed: geometry is empty");
    }
}
