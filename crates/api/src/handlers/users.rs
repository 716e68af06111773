//! Profile handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use fanevent_domain::{ProfileUpdate, PublicProfile, UserProfile};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{ApiJson, CurrentUser};
use crate::utils::execute_logged;

pub async fn get_me(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<UserProfile>> {
    let profile = execute_logged("users::get_me", || ctx.users.get_me(&user.actor)).await?;
    Ok(Json(profile))
}

pub async fn update_me(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> ApiResult<Json<UserProfile>> {
    let profile =
        execute_logged("users::update_me", || ctx.users.update_me(&user.actor, update)).await?;
    Ok(Json(profile))
}

pub async fn get_user(
    State(ctx): State<Arc<AppContext>>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<PublicProfile>> {
    let profile = execute_logged("users::get_user", || ctx.users.get_user(&id)).await?;
    Ok(Json(profile))
}
