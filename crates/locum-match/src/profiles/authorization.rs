use axum::http::HeaderMap;

use super::domain::{ActorId, UserId};

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const USER_ID_HEADER: &str = "x-user-id";

/// Decides who may record approve/reject/reset decisions.
pub trait AdminAuthorizer: Send + Sync {
    fn authorize(&self, headers: &HeaderMap) -> Result<ActorId, AuthorizationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    #[error("missing {0} header")]
    MissingHeader(&'static str),
    #[error("admin credentials rejected")]
    Rejected,
    #[error("admin access is disabled")]
    Disabled,
}

/// Compares the `x-admin-token` header against a configured shared secret and takes the
/// actor from `x-actor-id`. Without a configured token every caller is refused.
#[derive(Debug, Clone, Default)]
pub struct SharedTokenAuthorizer {
    token: Option<String>,
}

impl SharedTokenAuthorizer {
    pub fn new(token: Option<String>) -> Self {
        let token = token.filter(|token| !token.trim().is_empty());
        Self { token }
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }
}

impl AdminAuthorizer for SharedTokenAuthorizer {
    fn authorize(&self, headers: &HeaderMap) -> Result<ActorId, AuthorizationError> {
        let expected = self.token.as_deref().ok_or(AuthorizationError::Disabled)?;
        let presented = header_value(headers, ADMIN_TOKEN_HEADER)
            .ok_or(AuthorizationError::MissingHeader(ADMIN_TOKEN_HEADER))?;
        if presented != expected {
            return Err(AuthorizationError::Rejected);
        }
        let actor = header_value(headers, ACTOR_ID_HEADER)
            .ok_or(AuthorizationError::MissingHeader(ACTOR_ID_HEADER))?;
        Ok(ActorId(actor.to_string()))
    }
}

/// Account id asserted by the upstream session layer.
pub fn user_from_headers(headers: &HeaderMap) -> Result<UserId, AuthorizationError> {
    header_value(headers, USER_ID_HEADER)
        .map(|user| UserId(user.to_string()))
        .ok_or(AuthorizationError::MissingHeader(USER_ID_HEADER))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
