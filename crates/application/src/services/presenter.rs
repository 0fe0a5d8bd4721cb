//! Map drawing and textual route summary

use std::sync::Arc;
use std::time::Duration;

use domain::entities::{EmissionsEstimate, Session};
use domain::value_objects::RouteProfile;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{
    EmissionsPort, EmissionsRequest, GeoBounds, MapSurface, MarkerKind, RouteEmphasis, RouteStyle,
};

/// Shown instead of a CO₂ value when no estimate is available
pub const EMISSIONS_PLACEHOLDER: &str = "—";

/// Default upper bound for the emissions call
const DEFAULT_EMISSIONS_TIMEOUT: Duration = Duration::from_secs(5);

/// Text rendered next to the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedSummary {
    /// Selected profile
    pub profile: RouteProfile,
    /// Selected route distance, e.g. "2.19 km"
    pub distance: String,
    /// Selected route duration in whole minutes
    pub duration_minutes: u64,
    /// Eco route distance for comparison
    pub eco_distance: String,
    /// Fast route distance for comparison
    pub fast_distance: String,
    /// CO₂ estimate, e.g. "321 g", or the placeholder
    pub co2: String,
    /// Backend recommendation or the local default
    pub recommendation: String,
    /// Whether `co2` and `recommendation` came from the backend
    pub emissions_available: bool,
}

/// Recommendation used when the emissions backend has none
#[must_use]
pub const fn default_recommendation(profile: RouteProfile) -> &'static str {
    match profile {
        RouteProfile::Eco => {
            "You chose the eco route: cycling or walking it keeps emissions close to zero."
        },
        RouteProfile::Fast => {
            "You chose the fast route: consider car sharing or public transport to cut emissions."
        },
    }
}

fn format_km(km: f64) -> String {
    format!("{km:.2} km")
}

/// Draws sessions and builds their summary
pub struct Presenter {
    emissions: Option<Arc<dyn EmissionsPort>>,
    emissions_timeout: Duration,
}

impl std::fmt::Debug for Presenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("emissions", &self.emissions.is_some())
            .field("emissions_timeout", &self.emissions_timeout)
            .finish()
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new(None, DEFAULT_EMISSIONS_TIMEOUT)
    }
}

impl Presenter {
    /// Create a presenter; without an emissions port the placeholder is shown
    #[must_use]
    pub fn new(emissions: Option<Arc<dyn EmissionsPort>>, emissions_timeout: Duration) -> Self {
        Self {
            emissions,
            emissions_timeout,
        }
    }

    /// Draw a session and summarize it
    ///
    /// Never fails: an emissions error degrades to the placeholder.
    #[instrument(skip_all, fields(profile = %session.selected_profile()))]
    pub async fn render(&self, session: &Session, surface: &mut dyn MapSurface) -> RenderedSummary {
        Self::draw(session, surface);

        let profile = session.selected_profile();
        let selected = session.selected_route();
        let routes = session.routes();

        let (co2, recommendation, emissions_available) = match self.estimate(session).await {
            Ok(estimate) => {
                let recommendation = if estimate.recommendation.trim().is_empty() {
                    default_recommendation(profile).to_string()
                } else {
                    estimate.recommendation
                };
                (format!("{:.0} g", estimate.estimated_grams), recommendation, true)
            },
            Err(e) => {
                warn!(error = %e, "Showing placeholder emissions");
                (
                    EMISSIONS_PLACEHOLDER.to_string(),
                    default_recommendation(profile).to_string(),
                    false,
                )
            },
        };

        RenderedSummary {
            profile,
            distance: format_km(selected.distance_km()),
            duration_minutes: selected.duration_minutes(),
            eco_distance: format_km(routes.eco().distance_km()),
            fast_distance: format_km(routes.fast().distance_km()),
            co2,
            recommendation,
            emissions_available,
        }
    }

    /// Replace everything on the surface with this session
    fn draw(session: &Session, surface: &mut dyn MapSurface) {
        let selected = session.selected_route();
        let alternate = session.alternate_route();

        surface.clear();
        surface.draw_marker(MarkerKind::Origin, session.origin());
        surface.draw_marker(MarkerKind::Destination, session.destination());
        surface.draw_route(
            alternate,
            &RouteStyle::for_route(alternate.profile(), RouteEmphasis::Muted),
        );
        surface.draw_route(
            selected,
            &RouteStyle::for_route(selected.profile(), RouteEmphasis::Prominent),
        );

        let endpoints = [session.origin(), session.destination()];
        let points = selected
            .geometry()
            .iter()
            .chain(alternate.geometry())
            .chain(endpoints.iter());
        if let Some(bounds) = GeoBounds::enclosing(points) {
            surface.fit_bounds(bounds);
        }
    }

    async fn estimate(&self, session: &Session) -> Result<EmissionsEstimate, ApplicationError> {
        let port = self.emissions.as_ref().ok_or_else(|| {
            ApplicationError::EmissionsUnavailable("no emissions backend configured".to_string())
        })?;

        let request = EmissionsRequest {
            origin: session.origin(),
            destination: session.destination(),
            profile: session.selected_profile(),
        };

        let estimate = tokio::time::timeout(self.emissions_timeout, port.estimate(&request))
            .await
            .map_err(|_| {
                ApplicationError::EmissionsUnavailable(format!(
                    "no answer within {:?}",
                    self.emissions_timeout
                ))
            })??;

        if !estimate.estimated_grams.is_finite() || estimate.estimated_grams < 0.0 {
            return Err(ApplicationError::EmissionsUnavailable(format!(
                "invalid estimate {}",
                estimate.estimated_grams
            )));
        }

        debug!(grams = estimate.estimated_grams, "Emissions estimate received");
        Ok(estimate)
    }
}
