use chrono::{DateTime, Utc};

use super::domain::{ActorId, ProfileValidation, ValidationStatus};

/// Reasons a transition is refused before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("rejection notes must not be empty")]
    MissingRejectionNotes,
    #[error("cannot resubmit a profile in status {}", .0.label())]
    InvalidState(ValidationStatus),
}

fn normalize_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|notes| !notes.is_empty())
        .map(str::to_string)
}

impl ProfileValidation {
    /// Administrative approval. Blank notes are stored as `None`.
    pub fn approve(&self, actor: ActorId, at: DateTime<Utc>, notes: Option<&str>) -> Self {
        Self {
            status: ValidationStatus::Approved,
            admin_notes: normalize_notes(notes),
            approved_at: Some(at),
            approved_by: Some(actor),
        }
    }

    /// Administrative rejection; the rationale is mandatory.
    pub fn reject(&self, actor: ActorId, notes: &str) -> Result<Self, ValidationError> {
        let notes =
            normalize_notes(Some(notes)).ok_or(ValidationError::MissingRejectionNotes)?;
        Ok(Self {
            status: ValidationStatus::Rejected,
            admin_notes: Some(notes),
            approved_at: None,
            approved_by: Some(actor),
        })
    }

    /// Administrative reset, wiping every decision field.
    pub fn reset_to_pending(&self) -> Self {
        Self::pending()
    }

    /// Owner resubmission after a rejection. The rejection notes stay visible until the
    /// next decision so the owner can still see what to correct.
    pub fn resubmit(&self) -> Result<Self, ValidationError> {
        if self.status != ValidationStatus::Rejected {
            return Err(ValidationError::InvalidState(self.status));
        }
        Ok(Self {
            status: ValidationStatus::Pending,
            admin_notes: self.admin_notes.clone(),
            approved_at: None,
            approved_by: None,
        })
    }
}
