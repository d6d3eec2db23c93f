//! Item resources.

pub mod model;

pub use model::{AccessibleItem, Item, ItemPayload, ItemSummary, NewItem};
