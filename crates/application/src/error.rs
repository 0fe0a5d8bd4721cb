//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Input rejected before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Geocoding returned no candidates for the text
    #[error("No result found for {0}")]
    PlaceNotFound(String),

    /// Geocoding or routing service failed (transport, HTTP status, parse)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Routing service answered but has no route between the points
    #[error("No route found: {0}")]
    RouteNotFound(String),

    /// Emissions backend failed; only ever logged
    #[error("Emissions estimate unavailable: {0}")]
    EmissionsUnavailable(String),

    /// A newer request replaced this one
    #[error("Request superseded by a newer one")]
    Superseded,

    /// No route has been calculated yet
    #[error("No route has been calculated yet")]
    NoSession,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable(_))
    }

    /// Whether the UI should show this error to the user
    pub const fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Superseded | Self::EmissionsUnavailable(_))
    }
}
