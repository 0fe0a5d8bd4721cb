//! Debounced place suggestions
//!
//! Each keystroke calls [`SuggestionController::suggest`]. A newer call
//! retires the token of the previous one, so at most the latest query reaches
//! the UI.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use domain::entities::{PlaceCandidate, PlaceInput};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::ApplicationError;
use crate::services::geocoder::Geocoder;

/// What the UI should do with the suggestion list
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionOutcome {
    /// Show these candidates
    Candidates(Vec<PlaceCandidate>),
    /// Hide the list
    Cleared,
    /// A newer keystroke took over; leave the list alone
    Superseded,
}

/// Suggestion state for one input field
#[derive(Debug)]
pub struct SuggestionController {
    geocoder: Arc<Geocoder>,
    debounce: Duration,
    generation: AtomicU64,
    current: Mutex<CancellationToken>,
}

impl SuggestionController {
    /// Create a controller on top of a shared geocoder
    #[must_use]
    pub fn new(geocoder: Arc<Geocoder>, debounce: Duration) -> Self {
        Self {
            geocoder,
            debounce,
            generation: AtomicU64::new(0),
            current: Mutex::new(CancellationToken::new()),
        }
    }

    /// Retire the in-flight call and start a new generation
    fn begin(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let mut current = self.current.lock();
        current.cancel();
        *current = token.clone();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        (generation, token)
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Handle a keystroke
    pub async fn suggest(&self, query: &str) -> SuggestionOutcome {
        let (generation, token) = self.begin();

        if query.trim().is_empty() {
            return SuggestionOutcome::Cleared;
        }

        if !self.debounce.is_zero() {
            tokio::select! {
                biased;
                () = token.cancelled() => return SuggestionOutcome::Superseded,
                () = tokio::time::sleep(self.debounce) => {},
            }
        }

        let result = self.geocoder.geocode(query, &token).await;
        if !self.is_latest(generation) {
            debug!(generation, "Discarding superseded suggestions");
            return SuggestionOutcome::Superseded;
        }

        match result {
            Ok(candidates) if candidates.is_empty() => SuggestionOutcome::Cleared,
            Ok(candidates) => SuggestionOutcome::Candidates(candidates),
            Err(ApplicationError::Superseded) => SuggestionOutcome::Superseded,
            Err(e) => {
                warn!(error = %e, "Suggestion lookup failed");
                SuggestionOutcome::Cleared
            },
        }
    }

    /// Drop any pending suggestion lookup
    pub fn cancel(&self) {
        self.begin();
    }

    /// Apply a picked suggestion to an input field
    ///
    /// Pins the candidate's coordinate so that calculating a route does not
    /// geocode the text again.
    pub fn select(&self, input: &mut PlaceInput, candidate: &PlaceCandidate) {
        self.cancel();
        input.bind(candidate);
    }
}
