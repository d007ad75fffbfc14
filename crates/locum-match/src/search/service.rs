use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::gateway::{
    CatalogError, GeocodeError, GeocodingGateway, JobOfferLocation, OfferCatalog,
};
use crate::config::SearchConfig;
use crate::geo::{adjust_radius, GeoPoint, GeocodedPlace, RadiusAdjustment};

/// Free-text location plus the radius the user asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub location: String,
    #[serde(default)]
    pub radius_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub offer: JobOfferLocation,
    /// `None` when the location could not be geocoded and no distance filter applied.
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub radius: RadiusAdjustment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<GeocodedPlace>,
    pub hits: Vec<SearchHit>,
}

/// Proximity search over published offers.
pub struct JobSearch<G, C> {
    geocoder: Arc<G>,
    catalog: Arc<C>,
    config: SearchConfig,
}

impl<G, C> JobSearch<G, C>
where
    G: GeocodingGateway + 'static,
    C: OfferCatalog + 'static,
{
    pub fn new(geocoder: Arc<G>, catalog: Arc<C>, config: SearchConfig) -> Self {
        Self {
            geocoder,
            catalog,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Clamp the user's radius into `[0, max_radius_km]`, using the default when absent.
    pub fn requested_radius(&self, radius_km: Option<f64>) -> f64 {
        match radius_km {
            Some(radius) if radius.is_finite() => radius.clamp(0.0, self.config.max_radius_km),
            _ => self.config.default_radius_km,
        }
    }

    pub fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, SearchError> {
        let requested = self.requested_radius(query.radius_km);
        let location = query.location.trim();
        if location.is_empty() {
            return Err(SearchError::EmptyLocation);
        }

        let place = self.geocoder.geocode(location)?;
        let radius = adjust_radius(place.as_ref(), requested);
        debug!(
            location,
            requested_radius = radius.requested_km,
            effective_radius = radius.effective_km,
            city_wide = radius.city_wide,
            "search radius normalized"
        );

        let offers = self.catalog.published_offers()?;
        let hits = match place.as_ref().and_then(GeocodedPlace::center) {
            Some(center) => within_radius(offers, &center, radius.effective_km),
            None => offers
                .into_iter()
                .map(|offer| SearchHit {
                    offer,
                    distance_km: None,
                })
                .collect(),
        };

        info!(
            location,
            effective_radius = radius.effective_km,
            hits = hits.len(),
            geocoded = place.is_some(),
            "job search completed"
        );

        Ok(SearchOutcome { radius, place, hits })
    }
}

/// Keeps offers within `radius_km` of `center`, nearest first; ties ordered by offer id.
pub fn within_radius(
    offers: Vec<JobOfferLocation>,
    center: &GeoPoint,
    radius_km: f64,
) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = offers
        .into_iter()
        .filter(|offer| offer.position.is_valid())
        .map(|offer| {
            let distance = offer.position.distance_to(center);
            SearchHit {
                offer,
                distance_km: Some(distance),
            }
        })
        .filter(|hit| hit.distance_km.is_some_and(|distance| distance <= radius_km))
        .collect();

    hits.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.offer.offer_id.cmp(&b.offer.offer_id))
    });
    hits
}

/// Error raised by the job search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search location must not be empty")]
    EmptyLocation,
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
