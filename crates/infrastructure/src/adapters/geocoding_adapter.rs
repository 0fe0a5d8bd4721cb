//! Geocoding adapter - Implements GeocodingPort using integration_routing

use application::error::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::entities::PlaceCandidate;
use domain::value_objects::Coordinate;
use integration_routing::{GeocodedPlace, GeocodingClient, GeocodingError};
use tracing::{debug, instrument, warn};

/// Adapter for place search through a geocoding client (Nominatim)
pub struct GeocodingAdapter {
    client: Box<dyn GeocodingClient>,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("client", &"GeocodingClient")
            .finish()
    }
}

impl GeocodingAdapter {
    /// Create a new geocoding adapter
    pub fn new(client: impl GeocodingClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }

    /// Convert a geocoded place, dropping invalid coordinates
    fn convert_place(place: GeocodedPlace) -> Option<PlaceCandidate> {
        match Coordinate::new(place.latitude, place.longitude) {
            Ok(coordinate) => Some(PlaceCandidate::new(place.display_name, coordinate)),
            Err(e) => {
                warn!(name = %place.display_name, error = %e, "Dropping geocoding result");
                None
            },
        }
    }

    fn map_error(err: GeocodingError) -> ApplicationError {
        match err {
            GeocodingError::EmptyQuery => {
                ApplicationError::InvalidInput("place name must not be empty".to_string())
            },
            other => ApplicationError::ServiceUnavailable(format!("Geocoding failed: {other}")),
        }
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn search(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<PlaceCandidate>, ApplicationError> {
        let places = self
            .client
            .search(query, limit)
            .await
            .map_err(Self::map_error)?;

        let candidates: Vec<_> = places.into_iter().filter_map(Self::convert_place).collect();
        debug!(count = candidates.len(), "Geocoding candidates");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticGeocoder(Vec<GeocodedPlace>);

    #[async_trait]
    impl GeocodingClient for StaticGeocoder {
        async fn search(
            &self,
            _query: &str,
            _limit: u8,
        ) -> Result<Vec<GeocodedPlace>, GeocodingError> {
            Ok(self.0.clone())
        }
    }

    struct DownGeocoder;

    #[async_trait]
    impl GeocodingClient for DownGeocoder {
        async fn search(
            &self,
            _query: &str,
            _limit: u8,
        ) -> Result<Vec<GeocodedPlace>, GeocodingError> {
            Err(GeocodingError::RequestFailed("HTTP 503".to_string()))
        }
    }

    fn place(name: &str, latitude: f64, longitude: f64) -> GeocodedPlace {
        GeocodedPlace {
            display_name: name.to_string(),
            latitude,
            longitude,
        }
    }

    #[tokio::test]
    async fn test_out_of_range_results_dropped() {
        let adapter = GeocodingAdapter::new(StaticGeocoder(vec![
            place("Broken", 123.0, 2.0),
            place("Girona", 41.9794, 2.8214),
        ]));

        let candidates = adapter.search("Girona", 5).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].display_name, "Girona");
    }

    #[tokio::test]
    async fn test_failure_maps_to_service_unavailable() {
        let adapter = GeocodingAdapter::new(DownGeocoder);
        let err = adapter.search("Girona", 5).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_empty_query_maps_to_invalid_input() {
        let err = GeocodingAdapter::map_error(GeocodingError::EmptyQuery);
        assert!(matches!(err, ApplicationError::InvalidInput(_)));
    }
}
