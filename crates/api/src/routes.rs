//! Router assembly

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::context::AppContext;
use crate::handlers::{
    admin, applications, attendance, dashboard, events, groups, health, messaging,
    notifications, reminders, reports, users,
};

/// Build the full HTTP surface over a shared context.
pub fn router(ctx: Arc<AppContext>) -> Router {
    let cors = cors_layer(&ctx.config.server.cors_origins);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(ctx)
}

fn api_routes() -> Router<Arc<AppContext>> {
    Router::new()
        .route("/me", get(users::get_me).put(users::update_me))
        .route("/users/{id}", get(users::get_user))
        .merge(event_routes())
        .merge(group_routes())
        .route("/rsvps/mine", get(attendance::my_rsvps))
        .route("/attendance/mine", get(attendance::my_attendance))
        .route("/reminders", get(reminders::my_reminders))
        .route("/reminders/{id}", delete(reminders::delete_reminder))
        .merge(messaging_routes())
        .merge(notification_routes())
        .route("/organizer-applications", post(applications::apply))
        .route("/organizer-applications/mine", get(applications::my_applications))
        .route("/reports", post(reports::file_report))
        .route("/dashboard/organizer", get(dashboard::organizer_dashboard))
        .nest("/admin", admin_routes())
}

fn event_routes() -> Router<Arc<AppContext>> {
    Router::new()
        .route("/events", get(events::list_events).post(events::create_event))
        .route("/events/mine", get(events::list_my_events))
        .route("/events/liked", get(events::list_liked_events))
        .route(
            "/events/{id}",
            get(events::get_event).put(events::update_event).delete(events::delete_event),
        )
        .route("/events/{id}/rsvp", post(attendance::rsvp).delete(attendance::cancel_rsvp))
        .route("/events/{id}/like", get(events::like_status).post(events::toggle_like))
        .route("/events/{id}/attendees", get(attendance::attendees))
        .route("/events/{id}/check-in", post(attendance::check_in))
        .route("/events/{id}/check-out", post(attendance::check_out))
        .route("/events/{id}/reminders", put(reminders::set_event_reminders))
        .route("/events/{id}/export", get(events::export_attendees))
}

fn group_routes() -> Router<Arc<AppContext>> {
    Router::new()
        .route("/groups", get(groups::list_groups).post(groups::create_group))
        .route("/groups/mine", get(groups::list_my_groups))
        .route(
            "/groups/{id}",
            get(groups::get_group).put(groups::update_group).delete(groups::delete_group),
        )
        .route("/groups/{id}/join", post(groups::join_group).delete(groups::leave_group))
        .route("/groups/{id}/members", get(groups::group_members))
        .route("/groups/{id}/events", get(groups::group_events))
}

fn messaging_routes() -> Router<Arc<AppContext>> {
    Router::new()
        .route(
            "/conversations",
            get(messaging::list_conversations).post(messaging::open_conversation),
        )
        .route("/conversations/unread-count", get(messaging::unread_count))
        .route(
            "/conversations/{id}/messages",
            get(messaging::messages).post(messaging::send_message),
        )
        .route("/conversations/{id}/read", post(messaging::mark_read))
}

fn notification_routes() -> Router<Arc<AppContext>> {
    Router::new()
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/{id}/read", post(notifications::mark_read))
        .route("/notifications/{id}", delete(notifications::delete_notification))
}

fn admin_routes() -> Router<Arc<AppContext>> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}/role", put(admin::set_role))
        .route("/events/pending", get(admin::pending_events))
        .route("/events/{id}/moderate", post(admin::moderate_event))
        .route("/groups/pending", get(admin::pending_groups))
        .route("/groups/{id}/moderate", post(admin::moderate_group))
        .route("/applications", get(admin::list_applications))
        .route("/applications/{id}/approve", post(admin::approve_application))
        .route("/applications/{id}/reject", post(admin::reject_application))
        .route("/reports", get(admin::list_reports))
        .route("/reports/{id}/resolve", post(admin::resolve_report))
        .route("/reports/{id}/dismiss", post(admin::dismiss_report))
        .route("/dashboard", get(admin::admin_dashboard))
        .route("/export/events", get(admin::export_events))
        .route("/export/users", get(admin::export_users))
}

/// Any origin when the list is empty; otherwise only the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(origin = %origin, error = %err, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(parsed))
}
