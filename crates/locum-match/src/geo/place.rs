use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::distance::{calculate_distance, GeoPoint};

/// Place classification tags that describe a whole city or county.
pub const CITY_WIDE_TYPES: [&str; 2] = ["locality", "administrative_area_level_2"];

/// Viewport returned by the geocoder for a place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub northeast: GeoPoint,
    pub southwest: GeoPoint,
}

impl Bounds {
    pub const fn new(northeast: GeoPoint, southwest: GeoPoint) -> Self {
        Self {
            northeast,
            southwest,
        }
    }

    /// East-west extent measured along the southern edge.
    pub fn width_km(&self) -> f64 {
        calculate_distance(
            self.southwest.lat,
            self.southwest.lng,
            self.southwest.lat,
            self.northeast.lng,
        )
    }

    /// North-south extent measured along the western edge.
    pub fn height_km(&self) -> f64 {
        calculate_distance(
            self.southwest.lat,
            self.southwest.lng,
            self.northeast.lat,
            self.southwest.lng,
        )
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.northeast.lat + self.southwest.lat) / 2.0,
            (self.northeast.lng + self.southwest.lng) / 2.0,
        )
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat >= self.southwest.lat
            && point.lat <= self.northeast.lat
            && point.lng >= self.southwest.lng
            && point.lng <= self.northeast.lng
    }
}

/// Single geocoder answer for a free-text location, valid for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPlace {
    #[serde(default)]
    pub types: BTreeSet<String>,
    #[serde(default)]
    pub bounds: Option<Bounds>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
}

impl GeocodedPlace {
    pub fn with_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn bounded(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn located_at(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn has_type(&self, tag: &str) -> bool {
        self.types.contains(tag)
    }

    /// Point searches are measured from: the geocoder's location, else the bounds centre.
    pub fn center(&self) -> Option<GeoPoint> {
        self.location
            .or_else(|| self.bounds.as_ref().map(Bounds::center))
    }
}

/// Whether the place names a whole city or county rather than a district or address.
pub fn is_city_wide_search(place: Option<&GeocodedPlace>) -> bool {
    place.is_some_and(|place| CITY_WIDE_TYPES.iter().any(|tag| place.has_type(tag)))
}
