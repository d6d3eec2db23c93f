//! Checks on opaque client-supplied blobs.
//!
//! The server never interprets ciphertext, but it refuses to store a blob
//! without its nonce or an empty wrapped key.

use vault_core::error::AppError;
use vault_core::result::AppResult;

/// Reject an empty required blob.
pub fn require_blob(field: &str, value: &[u8]) -> AppResult<()> {
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(())
}
