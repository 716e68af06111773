//! Group handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fanevent_domain::{Event, Group, GroupFilter, GroupMember, GroupSummary, GroupUpdate, NewGroup};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery, CurrentUser};
use crate::utils::execute_logged;

pub async fn list_groups(
    State(ctx): State<Arc<AppContext>>,
    _user: CurrentUser,
    ApiQuery(filter): ApiQuery<GroupFilter>,
) -> ApiResult<Json<Vec<Group>>> {
    let groups = execute_logged("groups::list", || ctx.groups.list(&filter)).await?;
    Ok(Json(groups))
}

pub async fn create_group(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    ApiJson(new_group): ApiJson<NewGroup>,
) -> ApiResult<(StatusCode, Json<Group>)> {
    let group =
        execute_logged("groups::create", || ctx.groups.create(&user.actor, new_group)).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// Groups the caller belongs to.
pub async fn list_my_groups(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<Group>>> {
    let groups = execute_logged("groups::list_mine", || ctx.groups.list_mine(&user.actor)).await?;
    Ok(Json(groups))
}

pub async fn get_group(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<GroupSummary>> {
    let summary = execute_logged("groups::get", || ctx.groups.get(&user.actor, &id)).await?;
    Ok(Json(summary))
}

pub async fn update_group(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<GroupUpdate>,
) -> ApiResult<Json<Group>> {
    let group =
        execute_logged("groups::update", || ctx.groups.update(&user.actor, &id, update)).await?;
    Ok(Json(group))
}

pub async fn delete_group(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    execute_logged("groups::delete", || ctx.groups.delete(&user.actor, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn join_group(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<GroupSummary>> {
    let summary = execute_logged("groups::join", || ctx.groups.join(&user.actor, &id)).await?;
    Ok(Json(summary))
}

pub async fn leave_group(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    execute_logged("groups::leave", || ctx.groups.leave(&user.actor, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn group_members(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<GroupMember>>> {
    let members =
        execute_logged("groups::members", || ctx.groups.members(&user.actor, &id)).await?;
    Ok(Json(members))
}

pub async fn group_events(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Event>>> {
    let events = execute_logged("groups::events", || ctx.groups.events(&user.actor, &id)).await?;
    Ok(Json(events))
}
