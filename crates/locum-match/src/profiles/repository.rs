use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ProfileId, ProfileRole, ProfileValidation, UserId, ValidationStatus};
use super::gate::AccessGate;

/// Narrow projection of a cabinet or doctor profile: identity plus review fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub profile_id: ProfileId,
    pub user_id: UserId,
    pub role: ProfileRole,
    pub validation: ProfileValidation,
    pub submitted_at: DateTime<Utc>,
}

impl ProfileRecord {
    pub fn access_gate(&self) -> AccessGate {
        AccessGate::from_profile(Some(&self.validation))
    }

    pub fn status_view(&self) -> ProfileStatusView {
        ProfileStatusView {
            profile_id: self.profile_id.clone(),
            role: self.role,
            status: self.validation.status().label(),
            gate: self.access_gate().label(),
            admin_notes: self.validation.admin_notes().map(str::to_string),
            approved_at: self.validation.approved_at(),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
///
/// `write_validation` must overwrite all four review fields in one step.
pub trait ProfileRepository: Send + Sync {
    fn insert(&self, record: ProfileRecord) -> Result<ProfileRecord, RepositoryError>;
    fn fetch(&self, id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError>;
    fn find_for_user(
        &self,
        user_id: &UserId,
        role: ProfileRole,
    ) -> Result<Option<ProfileRecord>, RepositoryError>;
    fn write_validation(
        &self,
        id: &ProfileId,
        validation: &ProfileValidation,
    ) -> Result<(), RepositoryError>;
    /// Oldest submissions first, at most `limit` records.
    fn by_status(
        &self,
        status: ValidationStatus,
        limit: usize,
    ) -> Result<Vec<ProfileRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("profile already exists")]
    Conflict,
    #[error("profile not found")]
    NotFound,
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of a profile's review state for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileStatusView {
    pub profile_id: ProfileId,
    pub role: ProfileRole,
    pub status: &'static str,
    pub gate: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}
