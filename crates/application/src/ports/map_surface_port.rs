//! Map drawing port
//!
//! The presenter draws through this interface; a UI binds it to its map
//! widget.

use domain::entities::RouteResult;
use domain::value_objects::{Coordinate, RouteProfile};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

/// Visual weight of a route on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteEmphasis {
    /// The selected route
    Prominent,
    /// The alternate route
    Muted,
}

/// Line style for a drawn route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStyle {
    /// CSS color
    pub color: String,
    /// Line width in pixels
    pub weight: f32,
    /// Opacity 0..1
    pub opacity: f32,
    /// Dash pattern, solid if `None`
    pub dash_array: Option<String>,
    /// Emphasis the style was derived from
    pub emphasis: RouteEmphasis,
}

impl RouteStyle {
    /// Style for a profile's route: green for eco, blue for fast
    #[must_use]
    pub fn for_route(profile: RouteProfile, emphasis: RouteEmphasis) -> Self {
        let color = match profile {
            RouteProfile::Eco => "#16a34a",
            RouteProfile::Fast => "#2563eb",
        };
        match emphasis {
            RouteEmphasis::Prominent => Self {
                color: color.to_string(),
                weight: 6.0,
                opacity: 0.9,
                dash_array: None,
                emphasis,
            },
            RouteEmphasis::Muted => Self {
                color: color.to_string(),
                weight: 4.0,
                opacity: 0.5,
                dash_array: Some("6 6".to_string()),
                emphasis,
            },
        }
    }
}

/// Marker placed on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Trip start
    Origin,
    /// Trip end
    Destination,
}

/// Bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Minimum latitude
    pub south: f64,
    /// Minimum longitude
    pub west: f64,
    /// Maximum latitude
    pub north: f64,
    /// Maximum longitude
    pub east: f64,
}

impl GeoBounds {
    /// Smallest box containing all points; `None` for no points
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            let (lat, lon) = (p.latitude(), p.longitude());
            Some(match acc {
                None => Self {
                    south: lat,
                    west: lon,
                    north: lat,
                    east: lon,
                },
                Some(b) => Self {
                    south: b.south.min(lat),
                    west: b.west.min(lon),
                    north: b.north.max(lat),
                    east: b.east.max(lon),
                },
            })
        })
    }
}

/// Port for drawing on a map
#[cfg_attr(test, automock)]
pub trait MapSurface: Send {
    /// Remove all previously drawn routes and markers
    fn clear(&mut self);

    /// Place a marker
    fn draw_marker(&mut self, kind: MarkerKind, at: Coordinate);

    /// Draw a route polyline
    fn draw_route(&mut self, route: &RouteResult, style: &RouteStyle);

    /// Fit the view to a bounding box
    fn fit_bounds(&mut self, bounds: GeoBounds);
}
