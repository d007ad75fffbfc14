use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, GeocodedPlace};

/// Resolves free-text locations typed by users.
pub trait GeocodingGateway: Send + Sync {
    /// `Ok(None)` means the geocoder found nothing; searches then keep the requested radius.
    fn geocode(&self, location: &str) -> Result<Option<GeocodedPlace>, GeocodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoding service unavailable: {0}")]
    Unavailable(String),
    #[error("geocoding quota exceeded")]
    QuotaExceeded,
}

/// Identifier wrapper for published job offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OfferId(pub String);

/// Searchable projection of a job offer posted by a cabinet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOfferLocation {
    pub offer_id: OfferId,
    pub title: String,
    pub cabinet_id: String,
    pub city: String,
    pub position: GeoPoint,
}

/// Source of offers currently open to applications.
pub trait OfferCatalog: Send + Sync {
    fn published_offers(&self) -> Result<Vec<JobOfferLocation>, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("offer catalog unavailable: {0}")]
    Unavailable(String),
}
