//! Emissions adapter - Implements EmissionsPort using integration_routing

use application::error::ApplicationError;
use application::ports::{EmissionsPort, EmissionsRequest};
use async_trait::async_trait;
use domain::entities::EmissionsEstimate;
use integration_routing::{EmissionsClient, EmissionsQuery};
use tracing::instrument;

/// Adapter for the CO₂ estimation backend
pub struct EmissionsAdapter {
    client: Box<dyn EmissionsClient>,
}

impl std::fmt::Debug for EmissionsAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmissionsAdapter")
            .field("client", &"EmissionsClient")
            .finish()
    }
}

impl EmissionsAdapter {
    /// Create a new emissions adapter
    pub fn new(client: impl EmissionsClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }

    fn build_query(request: &EmissionsRequest) -> EmissionsQuery {
        EmissionsQuery {
            start_lat: request.origin.latitude(),
            start_lon: request.origin.longitude(),
            end_lat: request.destination.latitude(),
            end_lon: request.destination.longitude(),
            mode: request.profile.as_str().to_string(),
        }
    }
}

#[async_trait]
impl EmissionsPort for EmissionsAdapter {
    #[instrument(skip(self), fields(profile = %request.profile))]
    async fn estimate(
        &self,
        request: &EmissionsRequest,
    ) -> Result<EmissionsEstimate, ApplicationError> {
        let reply = self
            .client
            .estimate(&Self::build_query(request))
            .await
            .map_err(|e| ApplicationError::EmissionsUnavailable(e.to_string()))?;

        Ok(EmissionsEstimate {
            estimated_grams: reply.co2_estimated_g,
            recommendation: reply.recommendation,
        })
    }
}
