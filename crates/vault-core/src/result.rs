//! Convenience result type alias for the vault server.

use crate::error::AppError;

/// A specialized `Result` type for vault operations.
///
/// Defined so that every crate does not need to write
/// `Result<T, AppError>` explicitly.
pub type AppResult<T> = Result<T, AppError>;
