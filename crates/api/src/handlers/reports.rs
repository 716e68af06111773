use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fanevent_domain::{NewReport, Report};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{ApiJson, CurrentUser};
use crate::utils::execute_logged;

pub async fn file_report(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    ApiJson(payload): ApiJson<NewReport>,
) -> ApiResult<(StatusCode, Json<Report>)> {
    let report =
        execute_logged("reports::file", || ctx.reports.file_report(&user.actor, payload)).await?;
    Ok((StatusCode::CREATED, Json(report)))
}
