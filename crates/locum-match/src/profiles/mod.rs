//! Review workflow for cabinet and doctor profiles.
//!
//! A profile is created `Pending`, an administrator approves or rejects it, and a rejected
//! owner may resubmit. Every gated surface (routes, navigation, page guards) asks
//! [`AccessGate`] what the current status allows instead of branching on the status itself.

pub mod authorization;
pub mod domain;
pub mod gate;
pub mod repository;
pub mod router;
pub mod service;
mod transitions;

#[cfg(test)]
mod tests;

pub use authorization::{AdminAuthorizer, AuthorizationError, SharedTokenAuthorizer};
pub use domain::{
    is_access_granted, ActorId, ProfileId, ProfileRole, ProfileValidation, UserId,
    ValidationStatus,
};
pub use gate::AccessGate;
pub use repository::{ProfileRecord, ProfileRepository, ProfileStatusView, RepositoryError};
pub use router::{profile_router, AccessGateView, ProfileApi};
pub use service::{Clock, ProfileServiceError, ProfileValidationService, SystemClock};
pub use transitions::ValidationError;
