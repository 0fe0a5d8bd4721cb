//! Cached, cancellable geocoding
//!
//! Wraps a [`GeocodingPort`] with a TTL cache keyed by the normalized query
//! and with cooperative cancellation through a [`CancellationToken`].

use std::sync::Arc;
use std::time::Duration;

use domain::entities::PlaceCandidate;
use moka::future::Cache;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::error::ApplicationError;
use crate::ports::GeocodingPort;

/// Maximum number of cached queries
const GEOCODE_CACHE_CAPACITY: u64 = 1_000;

/// Geocoding service with caching and cancellation
pub struct Geocoder {
    port: Arc<dyn GeocodingPort>,
    cache: Option<Cache<String, Vec<PlaceCandidate>>>,
    max_candidates: u8,
}

impl std::fmt::Debug for Geocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geocoder")
            .field("caching", &self.cache.is_some())
            .field("max_candidates", &self.max_candidates)
            .finish_non_exhaustive()
    }
}

impl Geocoder {
    /// Create a geocoder
    ///
    /// `cache_ttl` of `None` disables caching.
    #[must_use]
    pub fn new(
        port: Arc<dyn GeocodingPort>,
        cache_ttl: Option<Duration>,
        max_candidates: u8,
    ) -> Self {
        let cache = cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(GEOCODE_CACHE_CAPACITY)
                .time_to_live(ttl)
                .build()
        });

        Self {
            port,
            cache,
            max_candidates: max_candidates.max(1),
        }
    }

    /// Cache key for a query: trimmed and lower-cased
    fn normalize(query: &str) -> String {
        query.trim().to_lowercase()
    }

    /// Resolve free text to ranked candidates
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for blank text
    /// - `ServiceUnavailable` when the service fails
    /// - `Superseded` when `cancel` fires before the answer arrives
    #[instrument(skip(self, cancel))]
    pub async fn geocode(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<PlaceCandidate>, ApplicationError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "place name must not be empty".to_string(),
            ));
        }
        if cancel.is_cancelled() {
            return Err(ApplicationError::Superseded);
        }

        let key = Self::normalize(trimmed);
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await {
                debug!(%key, count = hit.len(), "Geocode cache hit");
                return Ok(hit);
            }
        }

        let mut candidates = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(%key, "Geocode superseded");
                return Err(ApplicationError::Superseded);
            },
            result = self.port.search(trimmed, self.max_candidates) => result?,
        };
        candidates.truncate(usize::from(self.max_candidates));

        if let Some(cache) = &self.cache {
            cache.insert(key, candidates.clone()).await;
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use domain::value_objects::Coordinate;

    use super::*;
    use crate::ports::MockGeocodingPort;
    use crate::services::test_support::{FakeGeocoding, placa_catalunya};

    const TTL: Option<Duration> = Some(Duration::from_secs(60));

    #[tokio::test]
    async fn test_blank_query_is_invalid() {
        let port = Arc::new(FakeGeocoding::barcelona());
        let geocoder = Geocoder::new(port.clone(), TTL, 5);
        let err = geocoder
            .geocode("   ", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidInput(_)));
        assert_eq!(port.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let port = Arc::new(FakeGeocoding::barcelona());
        let geocoder = Geocoder::new(port.clone(), TTL, 5);
        let token = CancellationToken::new();

        let first = geocoder.geocode("Plaça Catalunya", &token).await.unwrap();
        let second = geocoder.geocode("  plaça catalunya ", &token).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(port.call_count(), 1);
    }

    #[tokio::test]
    async fn test_no_cache_when_ttl_disabled() {
        let port = Arc::new(FakeGeocoding::barcelona());
        let geocoder = Geocoder::new(port.clone(), None, 5);
        let token = CancellationToken::new();

        geocoder.geocode("Girona", &token).await.unwrap();
        geocoder.geocode("Girona", &token).await.unwrap();
        assert_eq!(port.call_count(), 2);
    }

    #[tokio::test]
    async fn test_truncates_and_keeps_order() {
        let mut fake = FakeGeocoding::default();
        for i in 0..8 {
            let c = Coordinate::new(41.0 + f64::from(i) / 100.0, 2.0).unwrap();
            fake = fake.with_place("carrer major", PlaceCandidate::new(format!("Major {i}"), c));
        }
        let geocoder = Geocoder::new(Arc::new(fake), TTL, 3);

        let places = geocoder
            .geocode("Carrer Major", &CancellationToken::new())
            .await
            .unwrap();
        let names: Vec<_> = places.iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, vec!["Major 0", "Major 1", "Major 2"]);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let mut mock = MockGeocodingPort::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_search()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(ApplicationError::ServiceUnavailable("HTTP 503".into())));
        mock.expect_search()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(vec![PlaceCandidate::new(
                    "Plaça de Catalunya, Barcelona",
                    placa_catalunya(),
                )])
            });

        let geocoder = Geocoder::new(Arc::new(mock), TTL, 5);
        let token = CancellationToken::new();

        let err = geocoder.geocode("Plaça Catalunya", &token).await.unwrap_err();
        assert!(err.is_retryable());
        let places = geocoder.geocode("Plaça Catalunya", &token).await.unwrap();
        assert_eq!(places.len(), 1);
    }

    #[tokio::test]
    async fn test_passes_limit_to_port() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_search()
            .withf(|query, limit| query == "Girona" && *limit == 5)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let geocoder = Geocoder::new(Arc::new(mock), TTL, 5);
        let places = geocoder
            .geocode(" Girona ", &CancellationToken::new())
            .await
            .unwrap();
        assert!(places.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_in_flight_returns_superseded() {
        let port = Arc::new(
            FakeGeocoding::barcelona().with_delay("barcelona", Duration::from_millis(200)),
        );
        let geocoder = Geocoder::new(port.clone(), TTL, 5);
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = geocoder.geocode("Barcelona", &token).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Superseded));

        // nothing was cached by the cancelled call
        geocoder
            .geocode("Barcelona", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(port.call_count(), 2);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_network() {
        let port = Arc::new(FakeGeocoding::barcelona());
        let geocoder = Geocoder::new(port.clone(), TTL, 5);
        let token = CancellationToken::new();
        token.cancel();

        let err = geocoder.geocode("Girona", &token).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Superseded));
        assert_eq!(port.call_count(), 0);
    }
}
