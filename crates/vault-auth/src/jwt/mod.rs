//! JWT claims, decoding, and encoding.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::Claims;
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;

use vault_core::config::{AuthConfig, JwtAlgorithm};
use vault_core::error::AppError;

fn algorithm(config: &AuthConfig) -> jsonwebtoken::Algorithm {
    match config.algorithm {
        JwtAlgorithm::Hs256 => jsonwebtoken::Algorithm::HS256,
        JwtAlgorithm::Rs256 => jsonwebtoken::Algorithm::RS256,
    }
}

fn read_pem(path: Option<&str>, what: &str) -> Result<Vec<u8>, AppError> {
    let path = path.ok_or_else(|| AppError::configuration(format!("No {what} configured")))?;
    std::fs::read(path)
        .map_err(|e| AppError::configuration(format!("Failed to read {what} '{path}': {e}")))
}
