//! Admin-only handlers
//!
//! Role checks live in the services; these handlers only route.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use fanevent_domain::{
    AdminDashboard, Event, Group, ModerationRequest, ModerationStatus, OrganizerApplication,
    Report, ReportStatus, ReviewNote, Role, UserProfile,
};
use serde::Deserialize;

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery, CurrentUser};
use crate::handlers::csv_download;
use crate::utils::execute_logged;

#[derive(Debug, Default, Deserialize)]
pub struct UserPage {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RoleChange {
    pub role: Role,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplicationQuery {
    #[serde(default)]
    pub status: Option<ModerationStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub status: Option<ReportStatus>,
}

/// Review bodies are optional; a request without a JSON content type
/// carries no note.
type OptionalNote = Result<Option<Json<ReviewNote>>, JsonRejection>;

fn review_note(body: OptionalNote) -> ApiResult<Option<String>> {
    Ok(body?.and_then(|Json(review)| review.note))
}

pub async fn list_users(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    ApiQuery(page): ApiQuery<UserPage>,
) -> ApiResult<Json<Vec<UserProfile>>> {
    let users = execute_logged("admin::list_users", || {
        ctx.users.list_users(&user.actor, page.limit, page.offset)
    })
    .await?;
    Ok(Json(users))
}

pub async fn set_role(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(change): ApiJson<RoleChange>,
) -> ApiResult<Json<UserProfile>> {
    let profile = execute_logged("admin::set_role", || {
        ctx.users.set_role(&user.actor, &id, change.role)
    })
    .await?;
    Ok(Json(profile))
}

pub async fn pending_events(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<Event>>> {
    let events =
        execute_logged("admin::pending_events", || ctx.moderation.pending_events(&user.actor))
            .await?;
    Ok(Json(events))
}

pub async fn pending_groups(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<Group>>> {
    let groups =
        execute_logged("admin::pending_groups", || ctx.moderation.pending_groups(&user.actor))
            .await?;
    Ok(Json(groups))
}

pub async fn moderate_event(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<ModerationRequest>,
) -> ApiResult<Json<Event>> {
    let event = execute_logged("admin::moderate_event", || {
        ctx.moderation.moderate_event(&user.actor, &id, request)
    })
    .await?;
    Ok(Json(event))
}

pub async fn moderate_group(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<ModerationRequest>,
) -> ApiResult<Json<Group>> {
    let group = execute_logged("admin::moderate_group", || {
        ctx.moderation.moderate_group(&user.actor, &id, request)
    })
    .await?;
    Ok(Json(group))
}

pub async fn list_applications(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<ApplicationQuery>,
) -> ApiResult<Json<Vec<OrganizerApplication>>> {
    let applications = execute_logged("admin::list_applications", || {
        ctx.applications.list(&user.actor, query.status)
    })
    .await?;
    Ok(Json(applications))
}

pub async fn approve_application(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: OptionalNote,
) -> ApiResult<Json<OrganizerApplication>> {
    let note = review_note(body)?;
    let application = execute_logged("admin::approve_application", || {
        ctx.applications.approve(&user.actor, &id, note)
    })
    .await?;
    Ok(Json(application))
}

pub async fn reject_application(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: OptionalNote,
) -> ApiResult<Json<OrganizerApplication>> {
    let note = review_note(body)?;
    let application = execute_logged("admin::reject_application", || {
        ctx.applications.reject(&user.actor, &id, note)
    })
    .await?;
    Ok(Json(application))
}

pub async fn list_reports(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> ApiResult<Json<Vec<Report>>> {
    let reports =
        execute_logged("admin::list_reports", || ctx.reports.list(&user.actor, query.status))
            .await?;
    Ok(Json(reports))
}

pub async fn resolve_report(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: OptionalNote,
) -> ApiResult<Json<Report>> {
    let note = review_note(body)?;
    let report =
        execute_logged("admin::resolve_report", || ctx.reports.resolve(&user.actor, &id, note))
            .await?;
    Ok(Json(report))
}

pub async fn dismiss_report(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: OptionalNote,
) -> ApiResult<Json<Report>> {
    let note = review_note(body)?;
    let report =
        execute_logged("admin::dismiss_report", || ctx.reports.dismiss(&user.actor, &id, note))
            .await?;
    Ok(Json(report))
}

pub async fn admin_dashboard(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<AdminDashboard>> {
    let dashboard = execute_logged("admin::dashboard", || ctx.dashboard.admin(&user.actor)).await?;
    Ok(Json(dashboard))
}

pub async fn export_events(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Response> {
    let export = execute_logged("admin::export_events", || ctx.exports.events_csv(&user.actor))
        .await?;
    Ok(csv_download(export))
}

pub async fn export_users(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Response> {
    let export =
        execute_logged("admin::export_users", || ctx.exports.users_csv(&user.actor)).await?;
    Ok(csv_download(export))
}
