use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::profiles::authorization::{ACTOR_ID_HEADER, ADMIN_TOKEN_HEADER, USER_ID_HEADER};
use crate::profiles::domain::{
    ActorId, ProfileId, ProfileRole, ProfileValidation, UserId, ValidationStatus,
};
use crate::profiles::repository::{ProfileRecord, ProfileRepository, RepositoryError};
use crate::profiles::service::{Clock, ProfileValidationService};
use crate::profiles::{profile_router, ProfileApi, SharedTokenAuthorizer};

pub(super) const ADMIN_TOKEN: &str = "review-desk";

pub(super) fn admin() -> ActorId {
    ActorId("admin-ops".to_string())
}

pub(super) fn doctor() -> UserId {
    UserId("user-doctor-1".to_string())
}

pub(super) fn cabinet_owner() -> UserId {
    UserId("user-cabinet-1".to_string())
}

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 8, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) struct FixedClock(pub(super) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(super) fn build_service() -> (
    ProfileValidationService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service =
        ProfileValidationService::with_clock(repository.clone(), Arc::new(FixedClock(fixed_now())));
    (service, repository)
}

pub(super) fn build_api() -> (
    ProfileApi<MemoryRepository, SharedTokenAuthorizer>,
    Arc<MemoryRepository>,
) {
    let (service, repository) = build_service();
    let api = ProfileApi {
        service: Arc::new(service),
        authorizer: Arc::new(SharedTokenAuthorizer::new(Some(ADMIN_TOKEN.to_string()))),
    };
    (api, repository)
}

pub(super) fn profile_router_with_api(
    api: ProfileApi<MemoryRepository, SharedTokenAuthorizer>,
) -> axum::Router {
    profile_router(api)
}

pub(super) fn admin_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ADMIN_TOKEN_HEADER, HeaderValue::from_static(ADMIN_TOKEN));
    headers.insert(ACTOR_ID_HEADER, HeaderValue::from_static("admin-ops"));
    headers
}

pub(super) fn owner_headers(user: &UserId) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_ID_HEADER,
        HeaderValue::from_str(&user.0).expect("ascii user id"),
    );
    headers
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ProfileId, ProfileRecord>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, id: &ProfileId) -> ProfileRecord {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
            .expect("record present")
    }
}

impl ProfileRepository for MemoryRepository {
    fn insert(&self, record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.profile_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.profile_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_for_user(
        &self,
        user_id: &UserId,
        role: ProfileRole,
    ) -> Result<Option<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|record| &record.user_id == user_id && record.role == role)
            .cloned())
    }

    fn write_validation(
        &self,
        id: &ProfileId,
        validation: &ProfileValidation,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.validation = validation.clone();
        Ok(())
    }

    fn by_status(
        &self,
        status: ValidationStatus,
        limit: usize,
    ) -> Result<Vec<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut matching: Vec<ProfileRecord> = guard
            .values()
            .filter(|record| record.validation.status() == status)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.profile_id.cmp(&b.profile_id))
        });
        matching.truncate(limit);
        Ok(matching)
    }
}

/// Serves reads from a fixed record but fails every write.
pub(super) struct ReadOnlyRepository {
    pub(super) record: ProfileRecord,
}

impl ProfileRepository for ReadOnlyRepository {
    fn insert(&self, _record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        Ok((id == &self.record.profile_id).then(|| self.record.clone()))
    }

    fn find_for_user(
        &self,
        _user_id: &UserId,
        _role: ProfileRole,
    ) -> Result<Option<ProfileRecord>, RepositoryError> {
        Ok(None)
    }

    fn write_validation(
        &self,
        _id: &ProfileId,
        _validation: &ProfileValidation,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn by_status(
        &self,
        _status: ValidationStatus,
        _limit: usize,
    ) -> Result<Vec<ProfileRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ProfileRepository for UnavailableRepository {
    fn insert(&self, _record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_for_user(
        &self,
        _user_id: &UserId,
        _role: ProfileRole,
    ) -> Result<Option<ProfileRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn write_validation(
        &self,
        _id: &ProfileId,
        _validation: &ProfileValidation,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_status(
        &self,
        _status: ValidationStatus,
        _limit: usize,
    ) -> Result<Vec<ProfileRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn rejected_record() -> ProfileRecord {
    ProfileRecord {
        profile_id: ProfileId("doctor-fixture".to_string()),
        user_id: doctor(),
        role: ProfileRole::Doctor,
        validation: ProfileValidation::pending()
            .reject(admin(), "diploma scan unreadable")
            .expect("notes present"),
        submitted_at: fixed_now(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
