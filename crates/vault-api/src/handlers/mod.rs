//! HTTP request handlers grouped by resource.

pub mod folder;
pub mod health;
pub mod item;
pub mod resource;
pub mod share;
