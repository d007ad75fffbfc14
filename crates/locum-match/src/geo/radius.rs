use serde::Serialize;

use super::place::{is_city_wide_search, GeocodedPlace};

/// Half the larger bounding-box side plus a 20% margin.
const CITY_RADIUS_FACTOR: f64 = 0.6;

/// Outcome of radius normalization, kept for logging and API responses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiusAdjustment {
    pub requested_km: f64,
    pub effective_km: f64,
    pub city_wide: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_radius_km: Option<f64>,
}

impl RadiusAdjustment {
    pub fn enlarged(&self) -> bool {
        self.effective_km > self.requested_km
    }
}

/// Radius (km) of a circle covering most of the place, when the place has bounds.
pub fn estimate_city_radius(place: &GeocodedPlace) -> Option<f64> {
    let bounds = place.bounds.as_ref()?;
    let width = bounds.width_km();
    let height = bounds.height_km();
    Some(width.max(height) * CITY_RADIUS_FACTOR)
}

/// Normalizes `requested_radius` against `place`, recording how the result was reached.
pub fn adjust_radius(place: Option<&GeocodedPlace>, requested_radius: f64) -> RadiusAdjustment {
    let unchanged = |city_wide, city_radius_km| RadiusAdjustment {
        requested_km: requested_radius,
        effective_km: requested_radius,
        city_wide,
        city_radius_km,
    };

    let place = match place {
        Some(place) if is_city_wide_search(Some(place)) => place,
        _ => return unchanged(false, None),
    };

    match estimate_city_radius(place) {
        Some(city_radius) if requested_radius < city_radius => RadiusAdjustment {
            requested_km: requested_radius,
            effective_km: city_radius.ceil(),
            city_wide: true,
            city_radius_km: Some(city_radius),
        },
        city_radius => unchanged(true, city_radius),
    }
}

/// Enlarges a radius that would under-cover a city-wide search; never shrinks it.
pub fn get_smart_radius(place: Option<&GeocodedPlace>, requested_radius: f64) -> f64 {
    adjust_radius(place, requested_radius).effective_km
}
