use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use locum_match::geo::{Bounds, GeoPoint, GeocodedPlace};
use locum_match::profiles::{
    ProfileId, ProfileRecord, ProfileRepository, ProfileRole, ProfileValidation, RepositoryError,
    UserId, ValidationStatus,
};
use locum_match::search::{
    CatalogError, GeocodeError, GeocodingGateway, JobOfferLocation, OfferCatalog, OfferId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<ProfileId, ProfileRecord>>>,
}

impl InMemoryProfileRepository {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<ProfileId, ProfileRecord>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("profile store poisoned".to_string()))
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn insert(&self, record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.profile_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.profile_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn find_for_user(
        &self,
        user_id: &UserId,
        role: ProfileRole,
    ) -> Result<Option<ProfileRecord>, RepositoryError> {
        Ok(self
            .lock()?
            .values()
            .find(|record| &record.user_id == user_id && record.role == role)
            .cloned())
    }

    fn write_validation(
        &self,
        id: &ProfileId,
        validation: &ProfileValidation,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.validation = validation.clone();
        Ok(())
    }

    fn by_status(
        &self,
        status: ValidationStatus,
        limit: usize,
    ) -> Result<Vec<ProfileRecord>, RepositoryError> {
        let mut records: Vec<ProfileRecord> = self
            .lock()?
            .values()
            .filter(|record| record.validation.status() == status)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        records.truncate(limit);
        Ok(records)
    }
}

/// Fixed offer list served until the listings backend is wired in.
#[derive(Clone)]
pub(crate) struct InMemoryOfferCatalog {
    offers: Arc<Vec<JobOfferLocation>>,
}

impl InMemoryOfferCatalog {
    pub(crate) fn new(offers: Vec<JobOfferLocation>) -> Self {
        Self {
            offers: Arc::new(offers),
        }
    }

    pub(crate) fn demo() -> Self {
        let offer = |id: &str, title: &str, cabinet: &str, city: &str, lat: f64, lng: f64| {
            JobOfferLocation {
                offer_id: OfferId(id.to_string()),
                title: title.to_string(),
                cabinet_id: cabinet.to_string(),
                city: city.to_string(),
                position: GeoPoint::new(lat, lng),
            }
        };

        Self::new(vec![
            offer(
                "offer-001",
                "Remplacement médecine générale, août",
                "cabinet-hotel-de-ville",
                "Paris",
                48.856614,
                2.3522219,
            ),
            offer(
                "offer-002",
                "Remplacement ponctuel, lundis",
                "cabinet-champ-de-mars",
                "Paris",
                48.8584,
                2.2945,
            ),
            offer(
                "offer-003",
                "Collaboration longue durée",
                "cabinet-montrouge",
                "Montrouge",
                48.8170,
                2.3190,
            ),
            offer(
                "offer-004",
                "Remplacement congé maternité",
                "cabinet-presqu-ile",
                "Lyon",
                45.7640,
                4.8357,
            ),
        ])
    }
}

impl OfferCatalog for InMemoryOfferCatalog {
    fn published_offers(&self) -> Result<Vec<JobOfferLocation>, CatalogError> {
        Ok(self.offers.as_ref().clone())
    }
}

/// Offline geocoder backed by a small table of known places, keyed case-insensitively.
#[derive(Clone)]
pub(crate) struct GazetteerGeocoder {
    places: Arc<HashMap<String, GeocodedPlace>>,
}

impl GazetteerGeocoder {
    pub(crate) fn france() -> Self {
        let city = |ne: (f64, f64), sw: (f64, f64), center: (f64, f64), address: &str| {
            let mut place = GeocodedPlace::with_types(["locality", "political"])
                .bounded(Bounds::new(
                    GeoPoint::new(ne.0, ne.1),
                    GeoPoint::new(sw.0, sw.1),
                ))
                .located_at(GeoPoint::new(center.0, center.1));
            place.formatted_address = Some(address.to_string());
            place
        };

        let places = [
            (
                "paris",
                city(
                    (48.9021449, 2.4699208),
                    (48.815573, 2.224199),
                    (48.856614, 2.3522219),
                    "Paris, France",
                ),
            ),
            (
                "lyon",
                city(
                    (45.808425, 4.898393),
                    (45.707486, 4.768930),
                    (45.764043, 4.835659),
                    "Lyon, France",
                ),
            ),
            (
                "montrouge",
                city(
                    (48.8233, 2.3299),
                    (48.8083, 2.2994),
                    (48.8162, 2.3174),
                    "92120 Montrouge, France",
                ),
            ),
        ]
        .into_iter()
        .map(|(name, place)| (name.to_string(), place))
        .collect();

        Self {
            places: Arc::new(places),
        }
    }
}

impl GeocodingGateway for GazetteerGeocoder {
    fn geocode(&self, location: &str) -> Result<Option<GeocodedPlace>, GeocodeError> {
        Ok(self.places.get(&location.trim().to_lowercase()).cloned())
    }
}

/// Parses `lat,lng` in decimal degrees.
pub(crate) fn parse_point(raw: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected 'lat,lng', got '{raw}'"))?;
    let parse = |value: &str, axis: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|err| format!("failed to parse {axis} '{value}' ({err})"))
    };

    let point = GeoPoint::new(parse(lat, "latitude")?, parse(lng, "longitude")?);
    if !point.is_valid() {
        return Err(format!("'{raw}' is outside valid latitude/longitude ranges"));
    }
    Ok(point)
}
