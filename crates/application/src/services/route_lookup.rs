//! Route lookup client
//!
//! Owns the caches, the suggestion state and the current [`Session`].
//! `calculate` replaces the session atomically and pins each geocoded place
//! to its input; `switch_profile` only changes the selection and never
//! touches the network. Editing an input through the client drops the
//! session, since its routes no longer match the inputs.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use domain::entities::{PlaceCandidate, PlaceInput, Session};
use domain::value_objects::{Coordinate, RouteProfile};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::error::ApplicationError;
use crate::ports::{EmissionsPort, GeocodingPort, MapSurface, RoutingPort};
use crate::services::geocoder::Geocoder;
use crate::services::presenter::{Presenter, RenderedSummary};
use crate::services::route_fetcher::RouteFetcher;
use crate::services::route_policy::{RoutePolicy, RoutePolicyConfig};
use crate::services::suggestions::SuggestionController;

/// Which end of the trip an input describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Origin,
    Destination,
}

impl Endpoint {
    const fn label(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Destination => "destination",
        }
    }
}

/// Client-side route lookup state
#[derive(Debug)]
pub struct RouteLookupClient {
    geocoder: Arc<Geocoder>,
    fetcher: RouteFetcher,
    presenter: Presenter,
    origin_suggestions: SuggestionController,
    destination_suggestions: SuggestionController,
    session: Mutex<Option<Session>>,
    generation: AtomicU64,
    current: Mutex<CancellationToken>,
}

impl RouteLookupClient {
    /// Create a client from its ports
    #[must_use]
    pub fn new(
        geocoding: Arc<dyn GeocodingPort>,
        routing: Arc<dyn RoutingPort>,
        config: &RoutePolicyConfig,
    ) -> Self {
        let geocoder = Arc::new(Geocoder::new(
            geocoding,
            config.cache_ttl(),
            config.max_candidates,
        ));
        let fetcher = RouteFetcher::new(routing, RoutePolicy::new(config), config.cache_ttl());

        Self {
            origin_suggestions: SuggestionController::new(Arc::clone(&geocoder), config.debounce()),
            destination_suggestions: SuggestionController::new(
                Arc::clone(&geocoder),
                config.debounce(),
            ),
            geocoder,
            fetcher,
            presenter: Presenter::default(),
            session: Mutex::new(None),
            generation: AtomicU64::new(0),
            current: Mutex::new(CancellationToken::new()),
        }
    }

    /// Attach an emissions backend
    #[must_use]
    pub fn with_emissions(mut self, emissions: Arc<dyn EmissionsPort>, timeout: Duration) -> Self {
        self.presenter = Presenter::new(Some(emissions), timeout);
        self
    }

    /// Suggestions for the origin field
    #[must_use]
    pub const fn origin_suggestions(&self) -> &SuggestionController {
        &self.origin_suggestions
    }

    /// Suggestions for the destination field
    #[must_use]
    pub const fn destination_suggestions(&self) -> &SuggestionController {
        &self.destination_suggestions
    }

    const fn suggestions_for(&self, endpoint: Endpoint) -> &SuggestionController {
        match endpoint {
            Endpoint::Origin => &self.origin_suggestions,
            Endpoint::Destination => &self.destination_suggestions,
        }
    }

    /// Type into the origin field
    ///
    /// A different text drops the pinned place and the current session.
    pub fn edit_origin(&self, input: &mut PlaceInput, text: impl Into<String>) {
        self.edit(Endpoint::Origin, input, text.into());
    }

    /// Type into the destination field
    ///
    /// A different text drops the pinned place and the current session.
    pub fn edit_destination(&self, input: &mut PlaceInput, text: impl Into<String>) {
        self.edit(Endpoint::Destination, input, text.into());
    }

    /// Pick an origin suggestion; picking a different place drops the session
    pub fn select_origin(&self, input: &mut PlaceInput, candidate: &PlaceCandidate) {
        self.pick(Endpoint::Origin, input, candidate);
    }

    /// Pick a destination suggestion; picking a different place drops the session
    pub fn select_destination(&self, input: &mut PlaceInput, candidate: &PlaceCandidate) {
        self.pick(Endpoint::Destination, input, candidate);
    }

    fn edit(&self, endpoint: Endpoint, input: &mut PlaceInput, text: String) {
        if input.text() == text {
            return;
        }
        input.set_text(text);
        self.invalidate(endpoint);
    }

    fn pick(&self, endpoint: Endpoint, input: &mut PlaceInput, candidate: &PlaceCandidate) {
        let changed = input.binding() != Some(candidate.coordinate);
        self.suggestions_for(endpoint).select(input, candidate);
        if changed {
            self.invalidate(endpoint);
        }
    }

    /// Routes for the old input are stale, in flight or committed
    fn invalidate(&self, endpoint: Endpoint) {
        debug!(endpoint = endpoint.label(), "Input changed");
        self.cancel();
        self.discard_session();
    }

    /// Retire the previous calculation and start a new generation
    fn begin(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let mut current = self.current.lock();
        current.cancel();
        *current = token.clone();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        (generation, token)
    }

    async fn resolve(
        &self,
        endpoint: Endpoint,
        input: &PlaceInput,
        cancel: &CancellationToken,
    ) -> Result<(Coordinate, Option<PlaceCandidate>), ApplicationError> {
        if let Some(bound) = input.binding() {
            debug!(endpoint = endpoint.label(), %bound, "Using pinned place");
            return Ok((bound, None));
        }

        let text = input.text().trim();
        if text.is_empty() {
            return Err(ApplicationError::InvalidInput(format!(
                "{} must not be empty",
                endpoint.label()
            )));
        }

        self.geocoder
            .geocode(text, cancel)
            .await?
            .into_iter()
            .next()
            .map(|candidate| (candidate.coordinate, Some(candidate)))
            .ok_or_else(|| ApplicationError::PlaceNotFound(text.to_string()))
    }

    fn pin(
        input: &mut PlaceInput,
        (coordinate, geocoded): (Coordinate, Option<PlaceCandidate>),
    ) -> Coordinate {
        if let Some(candidate) = geocoded {
            input.bind(&candidate);
        }
        coordinate
    }

    /// Resolve both inputs, fetch both routes and replace the session
    ///
    /// An input resolved by geocoding is bound to its first candidate: its
    /// text becomes the full place name and later calculations reuse the
    /// coordinate. Both inputs are bound once both resolve, even if routing
    /// then fails. On any error the previous session is kept as it was.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a blank input
    /// - `PlaceNotFound` when an input has no geocoding match
    /// - `ServiceUnavailable` or `RouteNotFound` from the services
    /// - `Superseded` when a newer `calculate` started meanwhile
    #[instrument(skip(self, origin, destination), fields(origin = origin.text(), destination = destination.text()))]
    pub async fn calculate(
        &self,
        origin: &mut PlaceInput,
        destination: &mut PlaceInput,
        profile: RouteProfile,
    ) -> Result<Session, ApplicationError> {
        let (generation, token) = self.begin();

        let (from, to) = tokio::join!(
            self.resolve(Endpoint::Origin, origin, &token),
            self.resolve(Endpoint::Destination, destination, &token),
        );
        let (from, to) = (from?, to?);
        let from = Self::pin(origin, from);
        let to = Self::pin(destination, to);

        let routes = self.fetcher.fetch_pair(from, to, &token).await?;
        let session = Session::new(from, to, routes, profile);

        let mut slot = self.session.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Calculation superseded before commit");
            return Err(ApplicationError::Superseded);
        }
        *slot = Some(session.clone());
        drop(slot);

        info!(
            %profile,
            eco_km = session.routes().eco().distance_km(),
            fast_km = session.routes().fast().distance_km(),
            "Session committed"
        );
        Ok(session)
    }

    /// Change the selected profile of the current session
    ///
    /// # Errors
    ///
    /// Returns `NoSession` if nothing has been calculated yet.
    pub fn switch_profile(&self, profile: RouteProfile) -> Result<Session, ApplicationError> {
        let mut slot = self.session.lock();
        let session = slot.as_mut().ok_or(ApplicationError::NoSession)?;
        session.select(profile);
        debug!(%profile, "Profile switched");
        Ok(session.clone())
    }

    /// Snapshot of the current session
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.session.lock().clone()
    }

    /// Forget the current session, e.g. after an input changed
    pub fn discard_session(&self) {
        if self.session.lock().take().is_some() {
            debug!("Session discarded");
        }
    }

    /// Abandon an in-flight calculation
    pub fn cancel(&self) {
        self.begin();
    }

    /// Draw the current session
    ///
    /// # Errors
    ///
    /// Returns `NoSession` if nothing has been calculated yet.
    pub async fn render(
        &self,
        surface: &mut dyn MapSurface,
    ) -> Result<RenderedSummary, ApplicationError> {
        let session = self.session().ok_or(ApplicationError::NoSession)?;
        Ok(self.presenter.render(&session, surface).await)
    }
}

#[cfg(test)]
mod tests {
    use domain::entities::PlaceCandidate;
    use domain::value_objects::TravelMode;

    use super::*;
    use crate::services::presenter::{EMISSIONS_PLACEHOLDER, default_recommendation};
    use crate::services::test_support::{
        DrawOp, FakeEmissions, FakeGeocoding, FakeRouting, RecordingSurface, girona,
        placa_catalunya, sagrada_familia,
    };

    struct Harness {
        geocoding: Arc<FakeGeocoding>,
        routing: Arc<FakeRouting>,
        client: RouteLookupClient,
    }

    fn harness_with(geocoding: FakeGeocoding, routing: FakeRouting) -> Harness {
        let geocoding = Arc::new(geocoding);
        let routing = Arc::new(routing);
        let client = RouteLookupClient::new(
            geocoding.clone(),
            routing.clone(),
            &RoutePolicyConfig::for_testing(),
        );
        Harness {
            geocoding,
            routing,
            client,
        }
    }

    fn harness() -> Harness {
        harness_with(FakeGeocoding::barcelona(), FakeRouting::all_ok())
    }

    fn inputs() -> (PlaceInput, PlaceInput) {
        (PlaceInput::new("Plaça Catalunya"), PlaceInput::new("Sagrada Família"))
    }

    #[tokio::test]
    async fn test_barcelona_scenario() {
        let h = harness();
        let (mut origin, mut destination) = inputs();

        let session = h
            .client
            .calculate(&mut origin, &mut destination, RouteProfile::Eco)
            .await
            .unwrap();

        assert_eq!(session.origin(), placa_catalunya());
        assert_eq!(session.destination(), sagrada_familia());
        for profile in RouteProfile::ALL {
            let route = session.routes().get(profile);
            assert!(route.distance_meters() > 0.0);
            assert!(route.duration_seconds() > 0.0);
        }
        assert_eq!(session.selected_profile(), RouteProfile::Eco);
        assert_eq!(h.client.session(), Some(session));
    }

    #[tokio::test]
    async fn test_bound_inputs_skip_geocoding() {
        let h = harness();
        let mut origin = PlaceInput::from_candidate(&PlaceCandidate::new("A", placa_catalunya()));
        let mut destination = PlaceInput::from_candidate(&PlaceCandidate::new("B", girona()));

        let session = h
            .client
            .calculate(&mut origin, &mut destination, RouteProfile::Fast)
            .await
            .unwrap();

        assert_eq!(h.geocoding.call_count(), 0);
        assert_eq!(session.destination(), girona());
        // Barcelona to Girona is too far to cycle
        assert_eq!(session.routes().eco().travel_mode(), TravelMode::Driving);
    }

    #[tokio::test]
    async fn test_switch_profile_makes_no_calls() {
        let h = harness();
        let (mut origin, mut destination) = inputs();
        h.client
            .calculate(&mut origin, &mut destination, RouteProfile::Eco)
            .await
            .unwrap();
        let (geocodes, routes) = (h.geocoding.call_count(), h.routing.call_count());

        let session = h.client.switch_profile(RouteProfile::Fast).unwrap();

        assert_eq!(session.selected_profile(), RouteProfile::Fast);
        assert_eq!(session.selected_route().profile(), RouteProfile::Fast);
        assert_eq!(h.geocoding.call_count(), geocodes);
        assert_eq!(h.routing.call_count(), routes);
    }

    #[test]
    fn test_switch_profile_without_session() {
        let h = harness();
        let err = h.client.switch_profile(RouteProfile::Fast).unwrap_err();
        assert!(matches!(err, ApplicationError::NoSession));
    }

    #[tokio::test]
    async fn test_blank_input_is_invalid() {
        let h = harness();
        let err = h
            .client
            .calculate(&mut PlaceInput::new(" "), &mut PlaceInput::new("Girona"), RouteProfile::Eco)
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::InvalidInput(_)));
        assert_eq!(h.routing.call_count(), 0);
    }

    #[tokio::test]
    async fn test_nonsense_place_keeps_session() {
        let h = harness();
        let (mut origin, mut destination) = inputs();
        let before = h
            .client
            .calculate(&mut origin, &mut destination, RouteProfile::Eco)
            .await
            .unwrap();

        let err = h
            .client
            .calculate(&mut origin, &mut PlaceInput::new("zzxqplkq12345"), RouteProfile::Fast)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No result found for zzxqplkq12345");
        assert_eq!(h.client.session(), Some(before));
    }

    #[tokio::test]
    async fn test_routing_failure_keeps_session() {
        let h = harness_with(
            FakeGeocoding::barcelona(),
            FakeRouting::all_ok().with_outcome(
                TravelMode::Driving,
                Err(ApplicationError::ServiceUnavailable("HTTP 502".into())),
            ),
        );
        let (mut origin, mut destination) = inputs();

        // eco by bike works, fast by car does not
        let err = h
            .client
            .calculate(&mut origin, &mut destination, RouteProfile::Eco)
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ServiceUnavailable(_)));
        assert!(h.client.session().is_none());
    }

    #[tokio::test]
    async fn test_route_not_found_is_distinct() {
        let h = harness_with(
            FakeGeocoding::barcelona(),
            FakeRouting::all_ok()
                .with_outcome(TravelMode::Cycling, Err(ApplicationError::RouteNotFound("c".into())))
                .with_outcome(TravelMode::Walking, Err(ApplicationError::RouteNotFound("w".into()))),
        );
        let (mut origin, mut destination) = inputs();

        let err = h
            .client
            .calculate(&mut origin, &mut destination, RouteProfile::Eco)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::RouteNotFound(_)));
    }

    #[tokio::test]
    async fn test_newer_calculation_wins() {
        let h = harness_with(
            FakeGeocoding::barcelona().with_delay("barcelona", Duration::from_millis(150)),
            FakeRouting::all_ok(),
        );
        let mut first_origin = PlaceInput::new("Plaça Catalunya");
        let mut second_origin = first_origin.clone();
        let mut slow = PlaceInput::new("Barcelona");
        let mut fast = PlaceInput::new("Girona");

        let (first, second) = tokio::join!(
            h.client.calculate(&mut first_origin, &mut slow, RouteProfile::Eco),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                h.client
                    .calculate(&mut second_origin, &mut fast, RouteProfile::Eco)
                    .await
            }
        );

        assert!(matches!(first, Err(ApplicationError::Superseded)));
        let committed = second.unwrap();
        assert_eq!(committed.destination(), girona());
        assert_eq!(h.client.session(), Some(committed));
    }

    #[tokio::test]
    async fn test_discard_session() {
        let h = harness();
        let (mut origin, mut destination) = inputs();
        h.client
            .calculate(&mut origin, &mut destination, RouteProfile::Eco)
            .await
            .unwrap();

        h.client.discard_session();
        assert!(h.client.session().is_none());
        assert!(matches!(
            h.client.render(&mut RecordingSurface::default()).await,
            Err(ApplicationError::NoSession)
        ));
    }

    #[tokio::test]
    async fn test_render_with_unreachable_emissions() {
        let geocoding = Arc::new(FakeGeocoding::barcelona());
        let routing = Arc::new(FakeRouting::all_ok());
        let client =
            RouteLookupClient::new(geocoding, routing, &RoutePolicyConfig::for_testing())
                .with_emissions(Arc::new(FakeEmissions::unreachable()), Duration::from_secs(1));
        let (mut origin, mut destination) = inputs();
        client
            .calculate(&mut origin, &mut destination, RouteProfile::Eco)
            .await
            .unwrap();

        let mut surface = RecordingSurface::default();
        let summary = client.render(&mut surface).await.unwrap();

        assert_eq!(summary.co2, EMISSIONS_PLACEHOLDER);
        assert_eq!(summary.recommendation, default_recommendation(RouteProfile::Eco));
        assert_eq!(summary.distance, "2.19 km");
        assert_eq!(surface.ops.first(), Some(&DrawOp::Clear));
    }

    #[tokio::test]
    async fn test_suggestions_share_geocode_cache() {
        let h = harness();
        let outcome = h.client.origin_suggestions().suggest("Girona").await;
        assert!(matches!(
            outcome,
            crate::services::suggestions::SuggestionOutcome::Candidates(_)
        ));

        h.client
            .calculate(
                &mut PlaceInput::new("girona"),
                &mut PlaceInput::new("Barcelona"),
                RouteProfile::Eco,
            )
            .await
            .unwrap();
        assert_eq!(h.geocoding.call_count(), 2);
    }

    #[tokio::test]
    async fn test_geocoded_inputs_are_pinned() {
        let config = RoutePolicyConfig {
            cache_ttl_secs: 0,
            ..RoutePolicyConfig::for_testing()
        };
        let geocoding = Arc::new(FakeGeocoding::barcelona());
        let client =
            RouteLookupClient::new(geocoding.clone(), Arc::new(FakeRouting::all_ok()), &config);
        let (mut origin, mut destination) = inputs();

        client
            .calculate(&mut origin, &mut destination, RouteProfile::Eco)
            .await
            .unwrap();
        assert_eq!(geocoding.call_count(), 2);
        assert_eq!(origin.binding(), Some(placa_catalunya()));
        assert_eq!(destination.binding(), Some(sagrada_familia()));
        assert_ne!(destination.text(), "Sagrada Família");

        let session = client
            .calculate(&mut origin, &mut destination, RouteProfile::Fast)
            .await
            .unwrap();
        assert_eq!(geocoding.call_count(), 2);
        assert_eq!(session.destination(), sagrada_familia());
    }

    #[tokio::test]
    async fn test_failed_geocode_pins_nothing() {
        let h = harness();
        let mut origin = PlaceInput::new("Plaça Catalunya");
        let mut destination = PlaceInput::new("zzxqplkq12345");

        h.client
            .calculate(&mut origin, &mut destination, RouteProfile::Eco)
            .await
            .unwrap_err();

        assert!(origin.binding().is_none());
        assert_eq!(origin.text(), "Plaça Catalunya");
    }

    #[tokio::test]
    async fn test_editing_an_input_drops_the_session() {
        let h = harness();
        let (mut origin, mut destination) = inputs();
        h.client
            .calculate(&mut origin, &mut destination, RouteProfile::Eco)
            .await
            .unwrap();

        let unchanged = destination.text().to_string();
        h.client.edit_destination(&mut destination, unchanged);
        assert!(h.client.session().is_some());

        h.client.edit_destination(&mut destination, "Girona");
        assert!(h.client.session().is_none());
        assert!(destination.binding().is_none());
    }

    #[tokio::test]
    async fn test_selecting_another_place_drops_the_session() {
        let h = harness();
        let (mut origin, mut destination) = inputs();
        h.client
            .calculate(&mut origin, &mut destination, RouteProfile::Eco)
            .await
            .unwrap();

        let same = PlaceCandidate::new("Plaça de Catalunya, Barcelona", placa_catalunya());
        h.client.select_origin(&mut origin, &same);
        assert!(h.client.session().is_some());

        let other = PlaceCandidate::new("Girona, Catalunya", girona());
        h.client.select_origin(&mut origin, &other);
        assert!(h.client.session().is_none());
        assert_eq!(origin.binding(), Some(girona()));
    }
}
