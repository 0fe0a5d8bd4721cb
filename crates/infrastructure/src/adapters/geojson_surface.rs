//! GeoJSON map surface
//!
//! Implements [`MapSurface`] by accumulating a GeoJSON `FeatureCollection`
//! that a web map (Leaflet, MapLibre) can render as-is. Route styles are
//! carried in each feature's `properties`.

use application::ports::{GeoBounds, MapSurface, MarkerKind, RouteStyle};
use domain::entities::RouteResult;
use domain::value_objects::Coordinate;
use serde_json::{Value, json};

/// Map surface producing GeoJSON
#[derive(Debug, Default, Clone)]
pub struct GeoJsonMapSurface {
    features: Vec<Value>,
    bounds: Option<GeoBounds>,
}

impl GeoJsonMapSurface {
    /// Create an empty surface
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drawn features
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Bounds the view was last fitted to
    #[must_use]
    pub const fn bounds(&self) -> Option<GeoBounds> {
        self.bounds
    }

    /// Current drawing as a GeoJSON `FeatureCollection`
    ///
    /// Features are in drawing order; a renderer that paints them in order
    /// shows the selected route on top.
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        let mut collection = json!({
            "type": "FeatureCollection",
            "features": self.features,
        });
        if let Some(b) = self.bounds {
            collection["bbox"] = json!([b.west, b.south, b.east, b.north]);
        }
        collection
    }

    fn position(c: Coordinate) -> Value {
        json!([c.longitude(), c.latitude()])
    }
}

impl MapSurface for GeoJsonMapSurface {
    fn clear(&mut self) {
        self.features.clear();
        self.bounds = None;
    }

    fn draw_marker(&mut self, kind: MarkerKind, at: Coordinate) {
        self.features.push(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": Self::position(at) },
            "properties": { "marker": kind },
        }));
    }

    fn draw_route(&mut self, route: &RouteResult, style: &RouteStyle) {
        let coordinates: Vec<Value> = route.geometry().iter().copied().map(Self::position).collect();
        self.features.push(json!({
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": coordinates },
            "properties": {
                "profile": route.profile(),
                "mode": route.travel_mode(),
                "distance_km": route.distance_km(),
                "duration_min": route.duration_minutes(),
                "color": style.color,
                "weight": style.weight,
                "opacity": style.opacity,
                "dashArray": style.dash_array,
                "emphasis": style.emphasis,
            },
        }));
    }

    fn fit_bounds(&mut self, bounds: GeoBounds) {
        self.bounds = Some(bounds);
    }
}
