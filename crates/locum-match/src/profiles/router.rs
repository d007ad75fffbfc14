use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::authorization::{user_from_headers, AdminAuthorizer, AuthorizationError};
use super::domain::{ProfileId, ProfileRole, UserId, ValidationStatus};
use super::gate::AccessGate;
use super::repository::{ProfileRepository, ProfileStatusView};
use super::service::{ProfileServiceError, ProfileValidationService};
use crate::error::AppError;

const DEFAULT_QUEUE_LIMIT: usize = 50;

/// Shared handler state: the service plus the admin authorization port.
pub struct ProfileApi<R, Z> {
    pub service: Arc<ProfileValidationService<R>>,
    pub authorizer: Arc<Z>,
}

impl<R, Z> Clone for ProfileApi<R, Z> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            authorizer: self.authorizer.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SubmitProfileRequest {
    pub user_id: UserId,
    pub role: ProfileRole,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApproveRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueueParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Gate plus the four derived predicates, as consumed by navigation.
#[derive(Debug, Clone, Serialize)]
pub struct AccessGateView {
    pub user_id: UserId,
    pub role: ProfileRole,
    pub gate: &'static str,
    pub requires_onboarding: bool,
    pub requires_waiting_page: bool,
    pub requires_correction_page: bool,
    pub grants_full_access: bool,
}

impl AccessGateView {
    pub fn new(user_id: UserId, role: ProfileRole, gate: AccessGate) -> Self {
        Self {
            user_id,
            role,
            gate: gate.label(),
            requires_onboarding: gate.requires_onboarding(),
            requires_waiting_page: gate.requires_waiting_page(),
            requires_correction_page: gate.requires_correction_page(),
            grants_full_access: gate.grants_full_access(),
        }
    }
}

/// Router builder exposing profile submission, review and gating endpoints.
pub fn profile_router<R, Z>(api: ProfileApi<R, Z>) -> Router
where
    R: ProfileRepository + 'static,
    Z: AdminAuthorizer + 'static,
{
    Router::new()
        .route("/api/v1/profiles", post(submit_handler::<R, Z>))
        .route("/api/v1/profiles/:profile_id", get(status_handler::<R, Z>))
        .route(
            "/api/v1/profiles/:profile_id/resubmit",
            post(resubmit_handler::<R, Z>),
        )
        .route("/api/v1/access/:role/:user_id", get(access_handler::<R, Z>))
        .route("/api/v1/admin/profiles", get(queue_handler::<R, Z>))
        .route(
            "/api/v1/admin/profiles/:profile_id/approve",
            post(approve_handler::<R, Z>),
        )
        .route(
            "/api/v1/admin/profiles/:profile_id/reject",
            post(reject_handler::<R, Z>),
        )
        .route(
            "/api/v1/admin/profiles/:profile_id/reset",
            post(reset_handler::<R, Z>),
        )
        .with_state(api)
}

pub(crate) async fn submit_handler<R, Z>(
    State(api): State<ProfileApi<R, Z>>,
    Json(request): Json<SubmitProfileRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
    Z: AdminAuthorizer + 'static,
{
    match api.service.submit_profile(request.user_id, request.role) {
        Ok(record) => (StatusCode::CREATED, Json(record.status_view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn status_handler<R, Z>(
    State(api): State<ProfileApi<R, Z>>,
    Path(profile_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    Z: AdminAuthorizer + 'static,
{
    match api.service.get(&ProfileId(profile_id)) {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn resubmit_handler<R, Z>(
    State(api): State<ProfileApi<R, Z>>,
    Path(profile_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: ProfileRepository + 'static,
    Z: AdminAuthorizer + 'static,
{
    let owner = match user_from_headers(&headers) {
        Ok(owner) => owner,
        Err(error) => return authorization_error_response(error),
    };

    match api.service.resubmit(&owner, &ProfileId(profile_id)) {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

/// Readable by the user the gate belongs to, or by an admin.
pub(crate) async fn access_handler<R, Z>(
    State(api): State<ProfileApi<R, Z>>,
    Path((role, user_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response
where
    R: ProfileRepository + 'static,
    Z: AdminAuthorizer + 'static,
{
    let role = match role.parse::<ProfileRole>() {
        Ok(role) => role,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
        }
    };

    let user_id = UserId(user_id);
    let caller = user_from_headers(&headers);
    let is_owner = matches!(&caller, Ok(caller) if caller == &user_id);
    if !is_owner && api.authorizer.authorize(&headers).is_err() {
        let error = caller.err().unwrap_or(AuthorizationError::Rejected);
        return authorization_error_response(error);
    }

    match api.service.access_gate(&user_id, role) {
        Ok(gate) => (StatusCode::OK, Json(AccessGateView::new(user_id, role, gate))).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn queue_handler<R, Z>(
    State(api): State<ProfileApi<R, Z>>,
    headers: HeaderMap,
    Query(params): Query<QueueParams>,
) -> Response
where
    R: ProfileRepository + 'static,
    Z: AdminAuthorizer + 'static,
{
    if let Err(error) = api.authorizer.authorize(&headers) {
        return authorization_error_response(error);
    }

    let status = match params.status.as_deref() {
        None => ValidationStatus::Pending,
        Some(raw) => match raw.parse::<ValidationStatus>() {
            Ok(status) => status,
            Err(message) => {
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
                    .into_response()
            }
        },
    };
    let limit = params.limit.unwrap_or(DEFAULT_QUEUE_LIMIT);

    match api.service.queue(status, limit) {
        Ok(records) => {
            let views: Vec<ProfileStatusView> =
                records.iter().map(|record| record.status_view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn approve_handler<R, Z>(
    State(api): State<ProfileApi<R, Z>>,
    Path(profile_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    R: ProfileRepository + 'static,
    Z: AdminAuthorizer + 'static,
{
    let actor = match api.authorizer.authorize(&headers) {
        Ok(actor) => actor,
        Err(error) => return authorization_error_response(error),
    };
    let notes = match approve_notes(&body) {
        Ok(notes) => notes,
        Err(error) => {
            let payload = json!({ "error": format!("invalid approval body: {error}") });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    match api
        .service
        .approve(actor, &ProfileId(profile_id), notes.as_deref())
    {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

/// An empty body means no notes; anything else must be a valid [`ApproveRequest`].
fn approve_notes(body: &[u8]) -> Result<Option<String>, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<ApproveRequest>(body).map(|request| request.notes)
}

pub(crate) async fn reject_handler<R, Z>(
    State(api): State<ProfileApi<R, Z>>,
    Path(profile_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<RejectRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
    Z: AdminAuthorizer + 'static,
{
    let actor = match api.authorizer.authorize(&headers) {
        Ok(actor) => actor,
        Err(error) => return authorization_error_response(error),
    };

    match api
        .service
        .reject(actor, &ProfileId(profile_id), &request.notes)
    {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn reset_handler<R, Z>(
    State(api): State<ProfileApi<R, Z>>,
    Path(profile_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: ProfileRepository + 'static,
    Z: AdminAuthorizer + 'static,
{
    let actor = match api.authorizer.authorize(&headers) {
        Ok(actor) => actor,
        Err(error) => return authorization_error_response(error),
    };

    match api.service.reset_to_pending(actor, &ProfileId(profile_id)) {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) fn service_error_response(error: ProfileServiceError) -> Response {
    AppError::from(error).into_response()
}

pub(crate) fn authorization_error_response(error: AuthorizationError) -> Response {
    let status = match error {
        AuthorizationError::MissingHeader(_) => StatusCode::UNAUTHORIZED,
        AuthorizationError::Rejected | AuthorizationError::Disabled => StatusCode::FORBIDDEN,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
