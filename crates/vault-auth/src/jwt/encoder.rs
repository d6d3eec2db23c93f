//! Access token issuance for local development and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use vault_core::config::{AuthConfig, JwtAlgorithm};
use vault_core::error::AppError;
use vault_core::types::UserId;

use super::claims::Claims;
use super::{algorithm, read_pem};

/// Signs access tokens with the configured key.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    header: Header,
    issuer: String,
    ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates an encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let encoding_key = match config.algorithm {
            JwtAlgorithm::Hs256 => EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            JwtAlgorithm::Rs256 => {
                let pem = read_pem(config.private_key_path.as_deref(), "private key")?;
                EncodingKey::from_rsa_pem(&pem).map_err(|e| {
                    AppError::configuration(format!("Invalid RSA private key: {e}"))
                })?
            }
        };

        Ok(Self {
            encoding_key,
            header: Header::new(algorithm(config)),
            issuer: config.issuer.clone(),
            ttl: Duration::minutes(config.access_ttl_minutes as i64),
        })
    }

    /// Issues a token for the user with the configured lifetime.
    pub fn issue(&self, user_id: UserId) -> Result<String, AppError> {
        self.issue_with_ttl(user_id, self.ttl)
    }

    /// Issues a token with an explicit lifetime.
    pub fn issue_with_ttl(&self, user_id: UserId, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Some(Uuid::new_v4()),
        };
        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }
}
