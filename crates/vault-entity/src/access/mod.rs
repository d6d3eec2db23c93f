//! Access levels, resource kinds, and grant records.

pub mod kind;
pub mod level;
pub mod model;

pub use kind::ResourceKind;
pub use level::AccessLevel;
pub use model::{Grant, NewResourceKey, ResourceKey};
