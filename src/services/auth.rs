//! Actor resolution.
//!
//! Every operation acts on behalf of a user identified by the
//! `X-User-Id` request header. There is no session or token layer; the
//! deployment trusts its network boundary.

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::{domain::user::User, error::ServiceError, state::SharedState};

/// Header carrying the acting user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Resolve the acting user from the request headers.
pub fn resolve_actor(state: &SharedState, headers: &HeaderMap) -> Result<User, ServiceError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ServiceError::PermissionDenied("missing X-User-Id header".into()))?;
    let id = Uuid::parse_str(raw)
        .map_err(|_| ServiceError::InvalidInput(format!("malformed user id: {raw}")))?;
    state
        .store()
        .user(id)
        .ok_or_else(|| ServiceError::NotFound(format!("unknown user {id}")))
}
