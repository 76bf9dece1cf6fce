//! The acting user, as established by the session collaborator in front of
//! this service.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

pub const ACTOR_HEADER: &str = "x-actor-id";

/// Authenticated caller id taken from the `x-actor-id` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(pub String);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| Actor(id.to_string()))
            .ok_or(ApiError::AuthRequired)
    }
}
