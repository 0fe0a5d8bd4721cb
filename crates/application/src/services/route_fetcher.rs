//! Route fetching for both profiles
//!
//! Walks the request chain produced by [`RoutePolicy`], caches results per
//! endpoint pair and profile, and fetches the eco and fast routes
//! concurrently.

use std::sync::Arc;
use std::time::Duration;

use domain::entities::{RoutePair, RouteResult};
use domain::value_objects::{Coordinate, CoordinateKey, RouteProfile};
use moka::future::Cache;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{RouteRequest, RoutingPort};
use crate::services::route_policy::RoutePolicy;

/// Maximum number of cached routes
const ROUTE_CACHE_CAPACITY: u64 = 500;

type RouteKey = (CoordinateKey, CoordinateKey, RouteProfile);

/// Fetches routes through a [`RoutingPort`]
pub struct RouteFetcher {
    routing: Arc<dyn RoutingPort>,
    policy: RoutePolicy,
    cache: Option<Cache<RouteKey, RouteResult>>,
}

impl std::fmt::Debug for RouteFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteFetcher")
            .field("policy", &self.policy)
            .field("caching", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl RouteFetcher {
    /// Create a fetcher; `cache_ttl` of `None` disables caching
    #[must_use]
    pub fn new(
        routing: Arc<dyn RoutingPort>,
        policy: RoutePolicy,
        cache_ttl: Option<Duration>,
    ) -> Self {
        let cache = cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(ROUTE_CACHE_CAPACITY)
                .time_to_live(ttl)
                .build()
        });

        Self {
            routing,
            policy,
            cache,
        }
    }

    /// Fetch the route for one profile
    ///
    /// # Errors
    ///
    /// - `RouteNotFound` when every request in the chain reports no route
    /// - `ServiceUnavailable` as soon as one request fails otherwise
    /// - `Superseded` when `cancel` fires first
    #[instrument(skip(self, cancel), fields(origin = %origin, destination = %destination))]
    pub async fn fetch_route(
        &self,
        profile: RouteProfile,
        origin: Coordinate,
        destination: Coordinate,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, ApplicationError> {
        let key = (origin.key(), destination.key(), profile);
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await {
                debug!(%profile, "Route cache hit");
                return Ok(hit);
            }
        }

        let mut last_error = ApplicationError::RouteNotFound(profile.to_string());

        for request in self.policy.plan(profile, origin, destination) {
            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ApplicationError::Superseded),
                outcome = self.routing.route(&request) => outcome,
            };

            match outcome {
                Ok(path) => {
                    let route = RouteResult::new(
                        path.geometry,
                        path.distance_meters,
                        path.duration_seconds,
                        profile,
                        request.travel_mode,
                    )
                    .map_err(|e| {
                        ApplicationError::ServiceUnavailable(format!(
                            "Malformed route from provider: {e}"
                        ))
                    })?;
                    info!(
                        %profile,
                        mode = %request.travel_mode,
                        km = route.distance_km(),
                        minutes = route.duration_minutes(),
                        "Route fetched"
                    );
                    if let Some(cache) = &self.cache {
                        cache.insert(key, route.clone()).await;
                    }
                    return Ok(route);
                },
                Err(ApplicationError::RouteNotFound(reason)) => {
                    warn!(
                        %profile,
                        mode = %request.travel_mode,
                        %reason,
                        "No route, trying next mode"
                    );
                    last_error =
                        ApplicationError::RouteNotFound(Self::describe(&request, &reason));
                },
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }

    fn describe(request: &RouteRequest, reason: &str) -> String {
        format!(
            "{} between {} and {}: {reason}",
            request.travel_mode, request.origin, request.destination
        )
    }

    /// Fetch the eco and fast routes concurrently
    ///
    /// Both must succeed. When both fail, the eco error is reported.
    ///
    /// # Errors
    ///
    /// Returns the first failing profile's error, in eco, fast order.
    pub async fn fetch_pair(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        cancel: &CancellationToken,
    ) -> Result<RoutePair, ApplicationError> {
        let (eco, fast) = tokio::join!(
            self.fetch_route(RouteProfile::Eco, origin, destination, cancel),
            self.fetch_route(RouteProfile::Fast, origin, destination, cancel),
        );
        Ok(RoutePair::new(eco?, fast?)?)
    }
}
