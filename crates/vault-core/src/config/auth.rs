//! Token validation configuration.

use serde::{Deserialize, Serialize};

/// Token signature algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JwtAlgorithm {
    /// HMAC-SHA256 with `jwt_secret`.
    Hs256,
    /// RSA-SHA256; the identity service holds the private key.
    Rs256,
}

/// Settings for validating the bearer tokens issued by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Signature algorithm.
    #[serde(default = "default_algorithm")]
    pub algorithm: JwtAlgorithm,
    /// Shared secret for HMAC-SHA256 token signatures.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// PEM public key used to verify RS256 tokens.
    #[serde(default)]
    pub public_key_path: Option<String>,
    /// PEM private key used to issue RS256 tokens (development only).
    #[serde(default)]
    pub private_key_path: Option<String>,
    /// Expected `iss` claim.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Lifetime of tokens issued by this server, in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Clock skew tolerance in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Cookie carrying the token when no Authorization header is sent.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            jwt_secret: default_jwt_secret(),
            public_key_path: None,
            private_key_path: None,
            issuer: default_issuer(),
            access_ttl_minutes: default_access_ttl(),
            leeway_seconds: default_leeway(),
            cookie_name: default_cookie_name(),
        }
    }
}

fn default_algorithm() -> JwtAlgorithm {
    JwtAlgorithm::Hs256
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION_0123456789abcdef".to_string()
}

fn default_issuer() -> String {
    "auth-service".to_string()
}

fn default_access_ttl() -> u64 {
    60 * 24
}

fn default_leeway() -> u64 {
    5
}

fn default_cookie_name() -> String {
    "auth_token".to_string()
}
