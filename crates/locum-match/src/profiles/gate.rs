use serde::Serialize;

use super::domain::{ProfileValidation, ValidationStatus};

/// Where a user may go given the review state of their role profile.
///
/// Route guards, navigation and page guards all derive their decision from
/// [`AccessGate::from_profile`] so they cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessGate {
    /// No profile submitted yet for the role.
    Onboarding,
    /// Profile awaiting an administrative decision.
    Waiting,
    /// Profile rejected; the owner must correct and resubmit.
    Correction,
    FullAccess,
}

impl AccessGate {
    pub fn from_profile(profile: Option<&ProfileValidation>) -> Self {
        match profile.map(ProfileValidation::status) {
            None => AccessGate::Onboarding,
            Some(ValidationStatus::Pending) => AccessGate::Waiting,
            Some(ValidationStatus::Rejected) => AccessGate::Correction,
            Some(ValidationStatus::Approved) => AccessGate::FullAccess,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AccessGate::Onboarding => "onboarding",
            AccessGate::Waiting => "waiting",
            AccessGate::Correction => "correction",
            AccessGate::FullAccess => "full_access",
        }
    }

    pub fn requires_onboarding(self) -> bool {
        self == AccessGate::Onboarding
    }

    pub fn requires_waiting_page(self) -> bool {
        self == AccessGate::Waiting
    }

    pub fn requires_correction_page(self) -> bool {
        self == AccessGate::Correction
    }

    pub fn grants_full_access(self) -> bool {
        self == AccessGate::FullAccess
    }
}
