//! Bridge from field validation to domain errors

use fanevent_common::validation::ValidationError;
use fanevent_domain::{FanEventError, Result};

/// Fail with `InvalidInput` listing every recorded field error.
pub(crate) fn ensure_valid(errors: ValidationError) -> Result<()> {
    errors.into_result().map_err(|err| FanEventError::InvalidInput(err.to_string()))
}

/// Trim an optional free-text field, dropping it when blank.
pub(crate) fn clean_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Clamp a caller-supplied page size.
pub(crate) fn page_size(limit: Option<u32>, default: u32) -> u32 {
    limit.unwrap_or(default).clamp(1, fanevent_domain::constants::MAX_PAGE_SIZE)
}
