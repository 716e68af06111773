use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use fanevent_domain::OrganizerEventStats;

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::CurrentUser;
use crate::utils::execute_logged;

/// Per-event statistics for the calling organizer.
pub async fn organizer_dashboard(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<OrganizerEventStats>>> {
    let stats =
        execute_logged("dashboard::organizer", || ctx.dashboard.organizer(&user.actor)).await?;
    Ok(Json(stats))
}
