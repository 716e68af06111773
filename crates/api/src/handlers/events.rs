//! Event handlers: listing, CRUD, likes and attendee export

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use fanevent_domain::{Event, EventFilter, EventSummary, EventUpdate, LikeStatus, NewEvent};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery, CurrentUser};
use crate::handlers::csv_download;
use crate::utils::execute_logged;

/// Approved events matching the search filter.
pub async fn list_events(
    State(ctx): State<Arc<AppContext>>,
    _user: CurrentUser,
    ApiQuery(filter): ApiQuery<EventFilter>,
) -> ApiResult<Json<Vec<Event>>> {
    let events = execute_logged("events::list", || ctx.events.list(&filter)).await?;
    Ok(Json(events))
}

pub async fn create_event(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    ApiJson(new_event): ApiJson<NewEvent>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    let event =
        execute_logged("events::create", || ctx.events.create(&user.actor, new_event)).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Events organized by the caller, any status.
pub async fn list_my_events(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<Event>>> {
    let events = execute_logged("events::list_mine", || ctx.events.list_mine(&user.actor)).await?;
    Ok(Json(events))
}

pub async fn list_liked_events(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<Event>>> {
    let events =
        execute_logged("events::liked", || ctx.likes.liked_events(&user.actor)).await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<EventSummary>> {
    let summary = execute_logged("events::get", || ctx.events.summary(&user.actor, &id)).await?;
    Ok(Json(summary))
}

pub async fn update_event(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<EventUpdate>,
) -> ApiResult<Json<Event>> {
    let event =
        execute_logged("events::update", || ctx.events.update(&user.actor, &id, update)).await?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    execute_logged("events::delete", || ctx.events.delete(&user.actor, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_like(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<LikeStatus>> {
    let status =
        execute_logged("events::toggle_like", || ctx.likes.toggle_like(&user.actor, &id)).await?;
    Ok(Json(status))
}

pub async fn like_status(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<LikeStatus>> {
    let status =
        execute_logged("events::like_status", || ctx.likes.like_status(&user.actor, &id)).await?;
    Ok(Json(status))
}

/// Attendee sheet for the organizer or an admin, as CSV.
pub async fn export_attendees(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let export = execute_logged("events::export_attendees", || {
        ctx.exports.event_attendees_csv(&user.actor, &id)
    })
    .await?;
    Ok(csv_download(export))
}
