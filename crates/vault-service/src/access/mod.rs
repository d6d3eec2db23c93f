//! Grant management shared by every resource kind.

pub mod service;

pub use service::{AccessService, RevokeRequest, ShareRequest};
