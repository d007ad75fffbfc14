use serde::{Deserialize, Serialize};

// The Earth's mean radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        calculate_distance(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Great-circle distance in km (Haversine), rounded to two decimals.
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlng / 2.0).sin().powi(2);
    // rounding can push `a` marginally outside [0, 1] for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    round_km(EARTH_RADIUS_KM * c)
}

fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
