//! # vault-auth
//!
//! Validation of the access tokens minted by the identity service. The vault
//! trusts the token subject as the caller's identity and nothing else.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
