//! Application services
//!
//! Services implement the route lookup use cases on top of the ports.

pub mod geocoder;
pub mod presenter;
pub mod route_fetcher;
pub mod route_lookup;
pub mod route_policy;
pub mod suggestions;

#[cfg(test)]
pub(crate) mod test_support;

pub use geocoder::Geocoder;
pub use presenter::{
    EMISSIONS_PLACEHOLDER, Presenter, RenderedSummary, default_recommendation,
};
pub use route_fetcher::RouteFetcher;
pub use route_lookup::RouteLookupClient;
pub use route_policy::{MAX_FALLBACKS_LIMIT, RoutePolicy, RoutePolicyConfig};
pub use suggestions::{SuggestionController, SuggestionOutcome};
