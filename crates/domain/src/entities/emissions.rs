//! CO₂ estimate returned by the emissions backend

use serde::{Deserialize, Serialize};

/// Estimated emissions for the selected route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsEstimate {
    /// Estimated CO₂ in grams
    pub estimated_grams: f64,
    /// Free-text advice from the backend
    pub recommendation: String,
}
