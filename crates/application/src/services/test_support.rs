//! Hand-written port fakes with call counters and artificial latency

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use domain::entities::{EmissionsEstimate, PlaceCandidate, RouteResult};
use domain::value_objects::{Coordinate, TravelMode};
use parking_lot::Mutex;

use crate::error::ApplicationError;
use crate::ports::{
    EmissionsPort, EmissionsRequest, GeoBounds, GeocodingPort, MapSurface, MarkerKind,
    RouteRequest, RouteStyle, RoutedPath, RoutingPort,
};

pub fn placa_catalunya() -> Coordinate {
    Coordinate::new(41.3869, 2.1701).unwrap()
}

pub fn sagrada_familia() -> Coordinate {
    Coordinate::new(41.4036, 2.1744).unwrap()
}

pub fn girona() -> Coordinate {
    Coordinate::new(41.9794, 2.8214).unwrap()
}

/// Geocoder answering from a fixed table, keyed by lower-cased query
#[derive(Default)]
pub struct FakeGeocoding {
    places: HashMap<String, Vec<PlaceCandidate>>,
    delays: HashMap<String, Duration>,
    failing: bool,
    pub calls: AtomicUsize,
    pub queries: Mutex<Vec<String>>,
}

impl FakeGeocoding {
    pub fn barcelona() -> Self {
        Self::default()
            .with_place(
                "plaça catalunya",
                PlaceCandidate::new("Plaça de Catalunya, Barcelona", placa_catalunya()),
            )
            .with_place(
                "sagrada família",
                PlaceCandidate::new("Sagrada Família, Barcelona", sagrada_familia()),
            )
            .with_place(
                "barcelona",
                PlaceCandidate::new("Barcelona, Catalunya", placa_catalunya()),
            )
            .with_place("girona", PlaceCandidate::new("Girona, Catalunya", girona()))
    }

    pub fn with_place(mut self, query: &str, candidate: PlaceCandidate) -> Self {
        self.places.entry(query.to_string()).or_default().push(candidate);
        self
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocodingPort for FakeGeocoding {
    async fn search(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<PlaceCandidate>, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = query.trim().to_lowercase();
        self.queries.lock().push(key.clone());
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing {
            return Err(ApplicationError::ServiceUnavailable("HTTP 503".to_string()));
        }
        Ok(self
            .places
            .get(&key)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .take(usize::from(limit))
            .collect())
    }
}

/// Router answering per travel mode
pub struct FakeRouting {
    outcomes: HashMap<TravelMode, Result<(f64, f64), ApplicationError>>,
    delay: Duration,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<RouteRequest>>,
}

impl FakeRouting {
    /// Every mode finds a route
    pub fn all_ok() -> Self {
        Self {
            outcomes: HashMap::from([
                (TravelMode::Cycling, Ok((2187.4, 611.0))),
                (TravelMode::Walking, Ok((2012.0, 1502.0))),
                (TravelMode::Driving, Ok((2611.3, 402.9))),
            ]),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_outcome(
        mut self,
        mode: TravelMode,
        outcome: Result<(f64, f64), ApplicationError>,
    ) -> Self {
        self.outcomes.insert(mode, outcome);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn modes(&self) -> Vec<TravelMode> {
        self.requests.lock().iter().map(|r| r.travel_mode).collect()
    }
}

fn clone_error(err: &ApplicationError) -> ApplicationError {
    match err {
        ApplicationError::RouteNotFound(p) => ApplicationError::RouteNotFound(p.clone()),
        other => ApplicationError::ServiceUnavailable(other.to_string()),
    }
}

#[async_trait]
impl RoutingPort for FakeRouting {
    async fn route(&self, request: &RouteRequest) -> Result<RoutedPath, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(*request);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.outcomes.get(&request.travel_mode) {
            Some(Ok((distance_meters, duration_seconds))) => Ok(RoutedPath {
                geometry: vec![request.origin, request.destination],
                distance_meters: *distance_meters,
                duration_seconds: *duration_seconds,
            }),
            Some(Err(e)) => Err(clone_error(e)),
            None => Err(ApplicationError::RouteNotFound(
                request.travel_mode.to_string(),
            )),
        }
    }
}

/// Emissions backend with a fixed answer, or always failing
pub struct FakeEmissions {
    reply: Option<EmissionsEstimate>,
    delay: Duration,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<EmissionsRequest>>,
}

impl FakeEmissions {
    pub fn answering(grams: f64, recommendation: &str) -> Self {
        Self {
            reply: Some(EmissionsEstimate {
                estimated_grams: grams,
                recommendation: recommendation.to_string(),
            }),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reply: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl EmissionsPort for FakeEmissions {
    async fn estimate(
        &self,
        request: &EmissionsRequest,
    ) -> Result<EmissionsEstimate, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(*request);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone().ok_or_else(|| {
            ApplicationError::EmissionsUnavailable("connection refused".to_string())
        })
    }
}

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Marker(MarkerKind),
    Route(domain::value_objects::RouteProfile, RouteStyle),
    Fit(GeoBounds),
}

/// Surface recording every call
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl MapSurface for RecordingSurface {
    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn draw_marker(&mut self, kind: MarkerKind, _at: Coordinate) {
        self.ops.push(DrawOp::Marker(kind));
    }

    fn draw_route(&mut self, route: &RouteResult, style: &RouteStyle) {
        self.ops.push(DrawOp::Route(route.profile(), style.clone()));
    }

    fn fit_bounds(&mut self, bounds: GeoBounds) {
        self.ops.push(DrawOp::Fit(bounds));
    }
}
