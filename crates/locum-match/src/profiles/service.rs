use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::domain::{ActorId, ProfileId, ProfileRole, ProfileValidation, UserId, ValidationStatus};
use super::gate::AccessGate;
use super::repository::{ProfileRecord, ProfileRepository, RepositoryError};
use super::transitions::ValidationError;

/// Time source for decision timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Service applying review transitions to stored profiles.
pub struct ProfileValidationService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

static PROFILE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_profile_id(role: ProfileRole) -> ProfileId {
    let id = PROFILE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProfileId(format!("{}-{id:06}", role.label()))
}

impl<R> ProfileValidationService<R>
where
    R: ProfileRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Record a user's role profile in `Pending`. A user holds at most one profile, whatever
    /// the role.
    pub fn submit_profile(
        &self,
        user_id: UserId,
        role: ProfileRole,
    ) -> Result<ProfileRecord, ProfileServiceError> {
        for held in ProfileRole::ALL {
            if self.repository.find_for_user(&user_id, held)?.is_some() {
                warn!(
                    %user_id,
                    requested = role.label(),
                    held = held.label(),
                    "profile submission refused: user already holds a role"
                );
                return Err(RepositoryError::Conflict.into());
            }
        }

        let record = ProfileRecord {
            profile_id: next_profile_id(role),
            user_id,
            role,
            validation: ProfileValidation::pending(),
            submitted_at: self.clock.now(),
        };

        let stored = self.repository.insert(record)?;
        info!(
            profile_id = %stored.profile_id,
            user_id = %stored.user_id,
            role = stored.role.label(),
            "profile submitted for review"
        );
        Ok(stored)
    }

    pub fn approve(
        &self,
        actor: ActorId,
        profile_id: &ProfileId,
        notes: Option<&str>,
    ) -> Result<ProfileRecord, ProfileServiceError> {
        let now = self.clock.now();
        self.transition(profile_id, &actor, |validation| {
            Ok(validation.approve(actor.clone(), now, notes))
        })
    }

    pub fn reject(
        &self,
        actor: ActorId,
        profile_id: &ProfileId,
        notes: &str,
    ) -> Result<ProfileRecord, ProfileServiceError> {
        self.transition(profile_id, &actor, |validation| {
            validation.reject(actor.clone(), notes)
        })
    }

    pub fn reset_to_pending(
        &self,
        actor: ActorId,
        profile_id: &ProfileId,
    ) -> Result<ProfileRecord, ProfileServiceError> {
        self.transition(profile_id, &actor, |validation| {
            Ok(validation.reset_to_pending())
        })
    }

    /// Owner-initiated return to review after a rejection.
    pub fn resubmit(
        &self,
        owner: &UserId,
        profile_id: &ProfileId,
    ) -> Result<ProfileRecord, ProfileServiceError> {
        let mut record = self.get(profile_id)?;
        if &record.user_id != owner {
            warn!(%profile_id, user_id = %owner, "resubmission by non-owner refused");
            return Err(ProfileServiceError::NotOwner);
        }

        record.validation = record.validation.resubmit()?;
        self.repository
            .write_validation(&record.profile_id, &record.validation)?;
        info!(%profile_id, user_id = %owner, "profile resubmitted for review");
        Ok(record)
    }

    pub fn get(&self, profile_id: &ProfileId) -> Result<ProfileRecord, ProfileServiceError> {
        let record = self
            .repository
            .fetch(profile_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Gate for `user_id` acting in `role`; a missing profile means onboarding.
    pub fn access_gate(
        &self,
        user_id: &UserId,
        role: ProfileRole,
    ) -> Result<AccessGate, ProfileServiceError> {
        let record = self.repository.find_for_user(user_id, role)?;
        let gate = AccessGate::from_profile(record.as_ref().map(|record| &record.validation));
        debug!(%user_id, role = role.label(), gate = gate.label(), "access gate evaluated");
        Ok(gate)
    }

    /// Review queue ordered by submission time.
    pub fn queue(
        &self,
        status: ValidationStatus,
        limit: usize,
    ) -> Result<Vec<ProfileRecord>, ProfileServiceError> {
        Ok(self.repository.by_status(status, limit)?)
    }

    fn transition<F>(
        &self,
        profile_id: &ProfileId,
        actor: &ActorId,
        apply: F,
    ) -> Result<ProfileRecord, ProfileServiceError>
    where
        F: FnOnce(&ProfileValidation) -> Result<ProfileValidation, ValidationError>,
    {
        let mut record = self.get(profile_id)?;
        let previous = record.validation.status();

        let next = apply(&record.validation)?;
        debug_assert!(next.is_consistent());

        self.repository.write_validation(profile_id, &next)?;
        record.validation = next;

        info!(
            %profile_id,
            %actor,
            from = previous.label(),
            to = record.validation.status().label(),
            "profile validation updated"
        );
        Ok(record)
    }
}

/// Error raised by the profile validation service.
#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("only the profile owner may resubmit")]
    NotOwner,
}
