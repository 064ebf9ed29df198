//! Presence checks for request payloads. Anything beyond presence is left to the store's constraints.

use crate::error::AppError;

/// Unwrap a required payload field or report it as a malformed request.
pub fn require<T>(field: &'static str, value: Option<T>) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Malformed(format!("{} is required", field)))
}

/// Parse a numeric path id. Non-integers are malformed, not missing.
pub fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Malformed(format!("invalid id '{}'", raw)))
}
