use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;

use locum_match::profiles::{profile_router, AdminAuthorizer, ProfileApi, ProfileRepository};
use locum_match::search::{search_router, GeocodingGateway, OfferCatalog, SearchApi};

/// Full HTTP surface: profile review, job search and the operational endpoints.
pub(crate) fn app_router<R, Z, G, C>(
    profiles: ProfileApi<R, Z>,
    search: SearchApi<G, C, R>,
) -> Router
where
    R: ProfileRepository + 'static,
    Z: AdminAuthorizer + 'static,
    G: GeocodingGateway + 'static,
    C: OfferCatalog + 'static,
{
    profile_router(profiles)
        .merge(search_router(search))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
