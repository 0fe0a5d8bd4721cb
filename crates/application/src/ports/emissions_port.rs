//! Emissions estimation port

use async_trait::async_trait;
use domain::entities::EmissionsEstimate;
use domain::value_objects::{Coordinate, RouteProfile};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Trip description sent to the emissions backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionsRequest {
    /// Origin
    pub origin: Coordinate,
    /// Destination
    pub destination: Coordinate,
    /// Selected profile
    pub profile: RouteProfile,
}

/// Port for the CO₂ estimation backend
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EmissionsPort: Send + Sync {
    /// Estimate emissions for a trip
    async fn estimate(
        &self,
        request: &EmissionsRequest,
    ) -> Result<EmissionsEstimate, ApplicationError>;
}
