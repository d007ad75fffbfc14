use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for cabinet and doctor profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileId(pub String);

/// Identifier of the account owning a profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier of the administrator recorded on a decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Marketplace side a profile belongs to. A user holds one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    Cabinet,
    Doctor,
}

impl ProfileRole {
    pub const ALL: [ProfileRole; 2] = [ProfileRole::Cabinet, ProfileRole::Doctor];

    pub const fn label(self) -> &'static str {
        match self {
            ProfileRole::Cabinet => "cabinet",
            ProfileRole::Doctor => "doctor",
        }
    }
}

impl FromStr for ProfileRole {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cabinet" => Ok(Self::Cabinet),
            "doctor" => Ok(Self::Doctor),
            other => Err(format!("unknown profile role '{other}'")),
        }
    }
}

/// Administrative review state of a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ValidationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ValidationStatus::Pending => "pending",
            ValidationStatus::Approved => "approved",
            ValidationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ValidationStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown validation status '{other}'")),
        }
    }
}

/// The four review fields of a profile record.
///
/// `approved_at` is set exactly when the status is `Approved`, and `approved_by` exactly
/// when the status is not `Pending`. Fields are private so only the transitions in
/// [`super::transitions`] can change them; stored payloads breaking the contract are
/// refused on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredValidation")]
pub struct ProfileValidation {
    pub(super) status: ValidationStatus,
    pub(super) admin_notes: Option<String>,
    pub(super) approved_at: Option<DateTime<Utc>>,
    pub(super) approved_by: Option<ActorId>,
}

impl ProfileValidation {
    /// Initial state assigned when a profile is first submitted.
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    pub fn admin_notes(&self) -> Option<&str> {
        self.admin_notes.as_deref()
    }

    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    pub fn approved_by(&self) -> Option<&ActorId> {
        self.approved_by.as_ref()
    }

    pub fn is_access_granted(&self) -> bool {
        self.status == ValidationStatus::Approved
    }

    /// Checks the derived-field contract against the current status.
    pub fn is_consistent(&self) -> bool {
        let approved = self.status == ValidationStatus::Approved;
        let decided = self.status != ValidationStatus::Pending;
        self.approved_at.is_some() == approved && self.approved_by.is_some() == decided
    }
}

/// Unchecked wire shape of [`ProfileValidation`].
#[derive(Deserialize)]
struct StoredValidation {
    status: ValidationStatus,
    #[serde(default)]
    admin_notes: Option<String>,
    #[serde(default)]
    approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    approved_by: Option<ActorId>,
}

impl TryFrom<StoredValidation> for ProfileValidation {
    type Error = String;

    fn try_from(stored: StoredValidation) -> Result<Self, Self::Error> {
        let validation = Self {
            status: stored.status,
            admin_notes: stored.admin_notes,
            approved_at: stored.approved_at,
            approved_by: stored.approved_by,
        };
        if validation.is_consistent() {
            Ok(validation)
        } else {
            Err(format!(
                "review fields inconsistent with status {}",
                validation.status.label()
            ))
        }
    }
}

/// Standalone form of [`ProfileValidation::is_access_granted`] for guards holding a record.
pub fn is_access_granted(validation: &ProfileValidation) -> bool {
    validation.is_access_granted()
}
