//! Typed path parameter helpers.

use uuid::Uuid;

use vault_core::error::AppError;
use vault_entity::ResourceKind;

/// Parses a UUID from a path segment.
pub fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(s).map_err(|_| AppError::validation(format!("Invalid UUID: {s}")))
}

/// Parses a resource kind (`folder`/`item`, plural accepted) from a path
/// segment.
pub fn parse_kind(s: &str) -> Result<ResourceKind, AppError> {
    s.parse()
}
