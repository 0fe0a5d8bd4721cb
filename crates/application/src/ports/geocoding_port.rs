//! Geocoding service port
//!
//! Resolves free text to ranked place candidates.

use async_trait::async_trait;
use domain::entities::PlaceCandidate;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for place search
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Search for places matching `query`
    ///
    /// Returns at most `limit` candidates in the service's own ranking order.
    /// An empty list means the service found nothing.
    async fn search(&self, query: &str, limit: u8)
    -> Result<Vec<PlaceCandidate>, ApplicationError>;
}
