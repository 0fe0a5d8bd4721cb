//! Places: geocoding candidates and input-field state

use serde::{Deserialize, Serialize};

use crate::value_objects::Coordinate;

/// One ranked geocoding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Full name as reported by the geocoding service
    pub display_name: String,
    /// Resolved position
    pub coordinate: Coordinate,
}

impl PlaceCandidate {
    /// Create a new candidate
    #[must_use]
    pub fn new(display_name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            display_name: display_name.into(),
            coordinate,
        }
    }
}

/// State of a single origin/destination input
///
/// Selecting a suggestion pins its coordinate to the input. The pin holds
/// for as long as the text is unchanged, so the same text is never
/// re-geocoded to a different place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceInput {
    text: String,
    binding: Option<Coordinate>,
}

impl PlaceInput {
    /// Input holding free text with no binding
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            binding: None,
        }
    }

    /// Input already bound to a candidate
    #[must_use]
    pub fn from_candidate(candidate: &PlaceCandidate) -> Self {
        let mut input = Self::default();
        input.bind(candidate);
        input
    }

    /// Current text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Pinned coordinate, if a candidate was selected for the current text
    #[must_use]
    pub const fn binding(&self) -> Option<Coordinate> {
        self.binding
    }

    /// Replace the text; a different text drops the binding
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.binding = None;
            self.text = text;
        }
    }

    /// Pin a selected candidate to this input
    pub fn bind(&mut self, candidate: &PlaceCandidate) {
        self.text.clone_from(&candidate.display_name);
        self.binding = Some(candidate.coordinate);
    }

    /// Whether the trimmed text is empty
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
