//! Distance math and search-radius normalization for geocoded places.

mod distance;
mod place;
mod radius;

pub use distance::{calculate_distance, GeoPoint};
pub use place::{is_city_wide_search, Bounds, GeocodedPlace, CITY_WIDE_TYPES};
pub use radius::{adjust_radius, estimate_city_radius, get_smart_radius, RadiusAdjustment};
