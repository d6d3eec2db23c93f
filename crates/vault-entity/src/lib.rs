//! # vault-entity
//!
//! Models for the encrypted resources held by the vault and the per-user
//! grants that distribute their wrapped keys. Row types derive
//! `sqlx::FromRow`; every blob field is opaque ciphertext the server never
//! interprets.

pub mod access;
pub mod folder;
pub mod item;

pub use access::{AccessLevel, Grant, NewResourceKey, ResourceKey, ResourceKind};
pub use folder::{AccessibleFolder, Folder, FolderPayload, NewFolder};
pub use item::{AccessibleItem, Item, ItemPayload, ItemSummary, NewItem};
