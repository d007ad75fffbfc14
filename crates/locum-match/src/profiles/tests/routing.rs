use super::common::*;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::profiles::domain::{ProfileRole, ValidationStatus};
use crate::profiles::router::{
    approve_handler, reject_handler, resubmit_handler, status_handler, RejectRequest,
};
use crate::profiles::service::ProfileValidationService;
use crate::profiles::{ProfileApi, SharedTokenAuthorizer};

#[tokio::test]
async fn submit_route_creates_pending_profile() {
    let (api, _) = build_api();
    let router = profile_router_with_api(api);

    let response = router
        .oneshot(
            Request::post("/api/v1/profiles")
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({ "user_id": "user-doctor-9", "role": "doctor" }))
                        .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("status"), Some(&json!("pending")));
    assert_eq!(payload.get("gate"), Some(&json!("waiting")));
}

#[tokio::test]
async fn access_route_reports_onboarding_for_unknown_user() {
    let (api, _) = build_api();
    let router = profile_router_with_api(api);

    let response = router
        .oneshot(
            Request::get("/api/v1/access/cabinet/nobody")
                .header("x-user-id", "nobody")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("gate"), Some(&json!("onboarding")));
    assert_eq!(payload.get("requires_onboarding"), Some(&json!(true)));
    assert_eq!(payload.get("grants_full_access"), Some(&json!(false)));
}

#[tokio::test]
async fn access_route_hides_other_users_gates() {
    let (api, _) = build_api();
    api.service
        .submit_profile(doctor(), ProfileRole::Doctor)
        .expect("submission succeeds");
    let router = profile_router_with_api(api);
    let path = format!("/api/v1/access/doctor/{}", doctor().0);

    let anonymous = router
        .clone()
        .oneshot(Request::get(&path).body(axum::body::Body::empty()).unwrap())
        .await
        .expect("route executes");
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let stranger = router
        .clone()
        .oneshot(
            Request::get(&path)
                .header("x-user-id", "user-cabinet-1")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(stranger.status(), StatusCode::FORBIDDEN);

    let reviewer = router
        .oneshot(
            Request::get(&path)
                .header("x-admin-token", ADMIN_TOKEN)
                .header("x-actor-id", "admin-ops")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(reviewer.status(), StatusCode::OK);
    let payload = read_json_body(reviewer).await;
    assert_eq!(payload.get("gate"), Some(&json!("waiting")));
}

#[tokio::test]
async fn access_route_rejects_unknown_role() {
    let (api, _) = build_api();
    let router = profile_router_with_api(api);

    let response = router
        .oneshot(
            Request::get("/api/v1/access/nurse/someone")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn approve_route_requires_admin_token() {
    let (api, repository) = build_api();
    let record = api
        .service
        .submit_profile(doctor(), ProfileRole::Doctor)
        .expect("submission succeeds");
    let router = profile_router_with_api(api);

    let response = router
        .oneshot(
            Request::post(format!(
                "/api/v1/admin/profiles/{}/approve",
                record.profile_id.0
            ))
            .header("x-admin-token", "wrong")
            .header("x-actor-id", "admin-ops")
            .body(axum::body::Body::empty())
            .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        repository.stored(&record.profile_id).validation.status(),
        ValidationStatus::Pending
    );
}

#[tokio::test]
async fn approve_route_accepts_empty_body() {
    let (api, repository) = build_api();
    let record = api
        .service
        .submit_profile(doctor(), ProfileRole::Doctor)
        .expect("submission succeeds");
    let router = profile_router_with_api(api);

    let response = router
        .oneshot(
            Request::post(format!(
                "/api/v1/admin/profiles/{}/approve",
                record.profile_id.0
            ))
            .header("x-admin-token", ADMIN_TOKEN)
            .header("x-actor-id", "admin-ops")
            .body(axum::body::Body::empty())
            .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let stored = repository.stored(&record.profile_id);
    assert_eq!(stored.validation.status(), ValidationStatus::Approved);
    assert_eq!(stored.validation.approved_by(), Some(&admin()));
}

#[tokio::test]
async fn approve_route_refuses_malformed_body() {
    let (api, repository) = build_api();
    let record = api
        .service
        .submit_profile(doctor(), ProfileRole::Doctor)
        .expect("submission succeeds");
    let router = profile_router_with_api(api);

    for body in [r#"{"notes": 42"#, r#"{"notes": 42}"#] {
        let response = router
            .clone()
            .oneshot(
                Request::post(format!(
                    "/api/v1/admin/profiles/{}/approve",
                    record.profile_id.0
                ))
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-admin-token", ADMIN_TOKEN)
                .header("x-actor-id", "admin-ops")
                .body(axum::body::Body::from(body))
                .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
    let stored = repository.stored(&record.profile_id);
    assert_eq!(stored.validation.status(), ValidationStatus::Pending);
    assert!(stored.validation.approved_by().is_none());
}

#[tokio::test]
async fn approve_handler_keeps_notes_from_body() {
    let (api, repository) = build_api();
    let record = api
        .service
        .submit_profile(doctor(), ProfileRole::Doctor)
        .expect("submission succeeds");

    let response = approve_handler(
        State(api),
        Path(record.profile_id.0.clone()),
        admin_headers(),
        Bytes::from_static(br#"{"notes": "  RPPS verified "}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        repository.stored(&record.profile_id).validation.admin_notes(),
        Some("RPPS verified")
    );
}

#[tokio::test]
async fn approve_handler_returns_not_found_for_missing_profile() {
    let (api, _) = build_api();

    let response = approve_handler(
        State(api),
        Path("doctor-404".to_string()),
        admin_headers(),
        Bytes::new(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reject_handler_returns_unprocessable_for_blank_notes() {
    let (api, repository) = build_api();
    let record = api
        .service
        .submit_profile(doctor(), ProfileRole::Doctor)
        .expect("submission succeeds");

    let response = reject_handler(
        State(api),
        Path(record.profile_id.0.clone()),
        admin_headers(),
        axum::Json(RejectRequest {
            notes: "  ".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        repository.stored(&record.profile_id).validation.status(),
        ValidationStatus::Pending
    );
}

#[tokio::test]
async fn resubmit_handler_requires_user_header() {
    let (api, _) = build_api();

    let response =
        resubmit_handler(State(api), Path("doctor-1".to_string()), HeaderMap::new()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn resubmit_handler_returns_conflict_when_not_rejected() {
    let (api, _) = build_api();
    let record = api
        .service
        .submit_profile(doctor(), ProfileRole::Doctor)
        .expect("submission succeeds");

    let response = resubmit_handler(
        State(api),
        Path(record.profile_id.0.clone()),
        owner_headers(&doctor()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn resubmit_handler_maps_foreign_owner_through_app_error() {
    let (api, _) = build_api();
    let record = api
        .service
        .submit_profile(doctor(), ProfileRole::Doctor)
        .expect("submission succeeds");
    api.service
        .reject(admin(), &record.profile_id, "expired licence")
        .expect("reject succeeds");

    let response = resubmit_handler(
        State(api),
        Path(record.profile_id.0.clone()),
        owner_headers(&cabinet_owner()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("error"),
        Some(&json!("profile error: only the profile owner may resubmit"))
    );
}

#[tokio::test]
async fn resubmit_handler_keeps_notes_in_view() {
    let (api, _) = build_api();
    let record = api
        .service
        .submit_profile(doctor(), ProfileRole::Doctor)
        .expect("submission succeeds");
    api.service
        .reject(admin(), &record.profile_id, "missing insurance certificate")
        .expect("reject succeeds");

    let response = resubmit_handler(
        State(api),
        Path(record.profile_id.0.clone()),
        owner_headers(&doctor()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("status"), Some(&json!("pending")));
    assert_eq!(
        payload.get("admin_notes"),
        Some(&json!("missing insurance certificate"))
    );
}

#[tokio::test]
async fn status_handler_returns_internal_error_when_store_is_down() {
    let api = ProfileApi {
        service: Arc::new(ProfileValidationService::new(Arc::new(UnavailableRepository))),
        authorizer: Arc::new(SharedTokenAuthorizer::new(None)),
    };

    let response = status_handler(State(api), Path("doctor-1".to_string())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn queue_route_lists_pending_profiles_for_admins() {
    let (api, _) = build_api();
    api.service
        .submit_profile(cabinet_owner(), ProfileRole::Cabinet)
        .expect("submission succeeds");
    let router = profile_router_with_api(api);

    let response = router
        .oneshot(
            Request::get("/api/v1/admin/profiles?status=pending&limit=5")
                .header("x-admin-token", ADMIN_TOKEN)
                .header("x-actor-id", "admin-ops")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload.as_array().expect("array payload");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].get("role"), Some(&json!("cabinet")));
}
