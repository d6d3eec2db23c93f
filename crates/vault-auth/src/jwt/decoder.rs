//! Access token validation.

use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;

use vault_core::config::{AuthConfig, JwtAlgorithm};
use vault_core::error::AppError;
use vault_core::types::UserId;

use super::claims::Claims;
use super::{algorithm, read_pem};

/// Validates access tokens and extracts the caller identity.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let decoding_key = match config.algorithm {
            JwtAlgorithm::Hs256 => DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            JwtAlgorithm::Rs256 => {
                let pem = read_pem(config.public_key_path.as_deref(), "public key")?;
                DecodingKey::from_rsa_pem(&pem).map_err(|e| {
                    AppError::configuration(format!("Invalid RSA public key: {e}"))
                })?
            }
        };

        let mut validation = Validation::new(algorithm(config));
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Decodes and validates a token: signature, expiry, and issuer.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                        AppError::authentication("Invalid token issuer")
                    }
                    _ => AppError::authentication("Invalid token"),
                }
            })
    }

    /// Validates a token and returns the caller's id.
    pub fn authenticate(&self, token: &str) -> Result<UserId, AppError> {
        self.decode(token)?.user_id()
    }
}
