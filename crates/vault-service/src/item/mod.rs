//! Item operations.

pub mod service;

pub use service::{CreateItemRequest, CreatedItem, ItemService, UpdateItemRequest};
