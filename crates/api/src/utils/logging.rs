//! Tracing bootstrap and structured outcome logging

use std::time::Duration;

use fanevent_domain::FanEventError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber once.
///
/// `FANEVENT_LOG_FORMAT=json` switches to JSON lines; anything else gives
/// the human-readable formatter. `RUST_LOG` filters, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("FANEVENT_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let result = if json { builder.json().try_init() } else { builder.try_init() };
    if let Err(err) = result {
        warn!(error = %err, "Tracing subscriber already installed");
    }
}

/// Log the outcome of a handler with structured fields.
///
/// `operation` must be a stable identifier without user data.
#[inline]
pub fn log_operation(
    operation: &str,
    elapsed: Duration,
    error: Option<&FanEventError>,
) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(operation, duration_ms, "operation_success"),
        Some(err) => warn!(
            operation,
            duration_ms,
            error_type = error_label(err),
            error = %err,
            "operation_failure"
        ),
    }
}

/// Stable label for an error, suitable for log aggregation.
#[inline]
pub fn error_label(error: &FanEventError) -> &'static str {
    match error {
        FanEventError::Database(_) => "database",
        FanEventError::Config(_) => "config",
        FanEventError::Auth(_) => "auth",
        FanEventError::Forbidden(_) => "forbidden",
        FanEventError::NotFound(_) => "not_found",
        FanEventError::InvalidInput(_) => "invalid_input",
        FanEventError::Conflict(_) => "conflict",
        FanEventError::Internal(_) => "internal",
    }
}
