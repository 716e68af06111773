//! Handler execution helpers

use std::future::Future;
use std::time::Instant;

use fanevent_domain::Result as DomainResult;

use crate::utils::logging::log_operation;

/// Run a service call, logging its name, duration and error label.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn get_event(
///     State(ctx): State<Arc<AppContext>>,
///     user: CurrentUser,
///     Path(id): Path<String>,
/// ) -> ApiResult<Json<EventSummary>> {
///     let summary =
///         execute_logged("events::get", || ctx.events.summary(&user.actor, &id)).await?;
///     Ok(Json(summary))
/// }
/// ```
pub async fn execute_logged<F, Fut, T>(operation: &str, handler_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();
    let result = handler_fn().await;
    log_operation(operation, start.elapsed(), result.as_ref().err());
    result
}
