//! Organizer application handlers for applicants

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fanevent_domain::{NewOrganizerApplication, OrganizerApplication};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{ApiJson, CurrentUser};
use crate::utils::execute_logged;

pub async fn apply(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    ApiJson(payload): ApiJson<NewOrganizerApplication>,
) -> ApiResult<(StatusCode, Json<OrganizerApplication>)> {
    let application =
        execute_logged("applications::apply", || ctx.applications.apply(&user.actor, payload))
            .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn my_applications(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<OrganizerApplication>>> {
    let applications =
        execute_logged("applications::mine", || ctx.applications.my_applications(&user.actor))
            .await?;
    Ok(Json(applications))
}
