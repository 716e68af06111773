//! Reminder handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fanevent_domain::{EventReminder, ReminderOffsets};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{ApiJson, CurrentUser};
use crate::utils::execute_logged;

/// Replace the caller's reminder offsets for an event.
pub async fn set_event_reminders(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(event_id): Path<String>,
    ApiJson(body): ApiJson<ReminderOffsets>,
) -> ApiResult<Json<Vec<EventReminder>>> {
    let reminders = execute_logged("reminders::set", || {
        ctx.reminders.set_reminders(&user.actor, &event_id, body.offsets)
    })
    .await?;
    Ok(Json(reminders))
}

pub async fn my_reminders(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<EventReminder>>> {
    let reminders =
        execute_logged("reminders::mine", || ctx.reminders.my_reminders(&user.actor)).await?;
    Ok(Json(reminders))
}

pub async fn delete_reminder(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    execute_logged("reminders::delete", || ctx.reminders.delete_reminder(&user.actor, &id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
