//! Notification inbox handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fanevent_domain::Notification;
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{ApiQuery, CurrentUser};
use crate::utils::execute_logged;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct UnreadNotifications {
    pub unread: u32,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: u32,
}

pub async fn list_notifications(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<NotificationQuery>,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = execute_logged("notifications::list", || {
        ctx.notifications.list(&user.actor, query.unread_only, query.limit)
    })
    .await?;
    Ok(Json(notifications))
}

pub async fn unread_count(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<UnreadNotifications>> {
    let unread =
        execute_logged("notifications::unread", || ctx.notifications.unread_count(&user.actor))
            .await?;
    Ok(Json(UnreadNotifications { unread }))
}

pub async fn mark_read(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    execute_logged("notifications::mark_read", || ctx.notifications.mark_read(&user.actor, &id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_read(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<MarkedRead>> {
    let updated =
        execute_logged("notifications::read_all", || ctx.notifications.mark_all_read(&user.actor))
            .await?;
    Ok(Json(MarkedRead { updated }))
}

pub async fn delete_notification(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    execute_logged("notifications::delete", || ctx.notifications.delete(&user.actor, &id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
