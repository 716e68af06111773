//! HTTP handlers, one module per feature area
//!
//! Handlers stay thin: extract, call the service through
//! [`execute_logged`](crate::utils::execute_logged), render.

pub mod admin;
pub mod applications;
pub mod attendance;
pub mod dashboard;
pub mod events;
pub mod groups;
pub mod health;
pub mod messaging;
pub mod notifications;
pub mod reminders;
pub mod reports;
pub mod users;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use fanevent_core::CsvExport;

/// Render a CSV export as a file download.
pub(crate) fn csv_download(export: CsvExport) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    (
        [(CONTENT_TYPE, "text/csv; charset=utf-8".to_string()), (CONTENT_DISPOSITION, disposition)],
        export.content,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn csv_download_sets_attachment_headers() {
        let response = csv_download(CsvExport {
            filename: "events.csv".into(),
            content: "id,title\n".into(),
        });

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/csv; charset=utf-8");
        assert_eq!(response.headers()[CONTENT_DISPOSITION], "attachment; filename=\"events.csv\"");
    }
}
