//! RSVP and check-in handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fanevent_domain::{Attendee, AttendanceSummary, Rsvp};
use serde::Deserialize;

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{ApiQuery, CurrentUser};
use crate::utils::execute_logged;

/// Optional attendee selector for organizer check-in/out; defaults to the
/// caller.
#[derive(Debug, Default, Deserialize)]
pub struct AttendeeQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

pub async fn rsvp(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(event_id): Path<String>,
) -> ApiResult<(StatusCode, Json<Rsvp>)> {
    let rsvp = execute_logged("rsvps::create", || ctx.rsvps.rsvp(&user.actor, &event_id)).await?;
    Ok((StatusCode::CREATED, Json(rsvp)))
}

pub async fn cancel_rsvp(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(event_id): Path<String>,
) -> ApiResult<StatusCode> {
    execute_logged("rsvps::cancel", || ctx.rsvps.cancel_rsvp(&user.actor, &event_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn my_rsvps(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<Rsvp>>> {
    let rsvps = execute_logged("rsvps::mine", || ctx.rsvps.my_rsvps(&user.actor)).await?;
    Ok(Json(rsvps))
}

pub async fn attendees(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(event_id): Path<String>,
) -> ApiResult<Json<Vec<Attendee>>> {
    let attendees =
        execute_logged("rsvps::attendees", || ctx.rsvps.attendees(&user.actor, &event_id)).await?;
    Ok(Json(attendees))
}

pub async fn check_in(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(event_id): Path<String>,
    ApiQuery(query): ApiQuery<AttendeeQuery>,
) -> ApiResult<Json<Rsvp>> {
    let target = query.user_id.unwrap_or_else(|| user.actor.user_id.clone());
    let rsvp = execute_logged("attendance::check_in", || {
        ctx.rsvps.check_in(&user.actor, &event_id, &target)
    })
    .await?;
    Ok(Json(rsvp))
}

pub async fn check_out(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(event_id): Path<String>,
    ApiQuery(query): ApiQuery<AttendeeQuery>,
) -> ApiResult<Json<Rsvp>> {
    let target = query.user_id.unwrap_or_else(|| user.actor.user_id.clone());
    let rsvp = execute_logged("attendance::check_out", || {
        ctx.rsvps.check_out(&user.actor, &event_id, &target)
    })
    .await?;
    Ok(Json(rsvp))
}

/// The caller's attendance history with total hours.
pub async fn my_attendance(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<AttendanceSummary>> {
    let summary =
        execute_logged("attendance::mine", || ctx.rsvps.my_attendance(&user.actor)).await?;
    Ok(Json(summary))
}
