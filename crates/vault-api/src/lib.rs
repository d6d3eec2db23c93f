//! # vault-api
//!
//! HTTP API layer for the vault built on Axum.
//!
//! Provides the REST endpoints, middleware (CORS, logging, timeouts),
//! extractors, DTOs, and error mapping. Handlers resolve the resource kind
//! once and call into `vault-service`; no access decision is made here.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
