use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::gateway::{GeocodingGateway, OfferCatalog};
use super::service::{JobSearch, SearchQuery};
use crate::error::AppError;
use crate::profiles::authorization::user_from_headers;
use crate::profiles::router::{authorization_error_response, service_error_response};
use crate::profiles::{ProfileRepository, ProfileRole, ProfileValidationService};

/// Handler state: the search plus the profile service used to gate doctors.
pub struct SearchApi<G, C, R> {
    pub search: Arc<JobSearch<G, C>>,
    pub profiles: Arc<ProfileValidationService<R>>,
}

impl<G, C, R> Clone for SearchApi<G, C, R> {
    fn clone(&self) -> Self {
        Self {
            search: self.search.clone(),
            profiles: self.profiles.clone(),
        }
    }
}

pub fn search_router<G, C, R>(api: SearchApi<G, C, R>) -> Router
where
    G: GeocodingGateway + 'static,
    C: OfferCatalog + 'static,
    R: ProfileRepository + 'static,
{
    Router::new()
        .route("/api/v1/search", post(search_handler::<G, C, R>))
        .with_state(api)
}

pub(crate) async fn search_handler<G, C, R>(
    State(api): State<SearchApi<G, C, R>>,
    headers: HeaderMap,
    Json(query): Json<SearchQuery>,
) -> Response
where
    G: GeocodingGateway + 'static,
    C: OfferCatalog + 'static,
    R: ProfileRepository + 'static,
{
    let user_id = match user_from_headers(&headers) {
        Ok(user_id) => user_id,
        Err(error) => return authorization_error_response(error),
    };

    let gate = match api.profiles.access_gate(&user_id, ProfileRole::Doctor) {
        Ok(gate) => gate,
        Err(error) => return service_error_response(error),
    };
    if !gate.grants_full_access() {
        let payload = json!({
            "error": "doctor profile must be approved before searching",
            "gate": gate.label(),
        });
        return (StatusCode::FORBIDDEN, Json(payload)).into_response();
    }

    match api.search.search(&query) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}
