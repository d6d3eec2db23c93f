//! Shared domain types.

pub mod id;

pub use id::{FolderId, ItemId, RequestId, UserId};
