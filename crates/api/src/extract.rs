//! Request extractors

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use fanevent_core::Actor;
use fanevent_domain::{FanEventError, UserProfile};
use tracing::debug;

use crate::context::AppContext;
use crate::error::ApiError;

/// Authenticated caller resolved from the bearer token.
///
/// Extraction verifies the token, then creates or refreshes the local
/// profile so every authenticated request sees an up-to-date user record.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub actor: Actor,
    pub profile: UserProfile,
}

impl FromRequestParts<Arc<AppContext>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &Arc<AppContext>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = ctx.verifier.verify(token)?;
        let (actor, profile) = ctx.users.sync_from_identity(&claims).await?;

        debug!(user_id = %actor.user_id, role = ?actor.role, "Authenticated request");
        Ok(Self { actor, profile })
    }
}

/// JSON body whose rejection renders through [`ApiError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string whose rejection renders through [`ApiError`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| FanEventError::Auth("missing bearer token".into()))?;
    let value = header
        .to_str()
        .map_err(|_| FanEventError::Auth("authorization header is not valid ASCII".into()))?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| FanEventError::Auth("authorization header must be a bearer token".into()))?;
    Ok(token)
}
