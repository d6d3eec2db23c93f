//! # vault-service
//!
//! Access control and key distribution for the vault. Services check the
//! caller's grant before every mutation and group multi-row changes into a
//! single store unit, so a resource never exists without exactly one OWNER
//! grant and a grant never outlives a failed creation.

pub mod access;
pub mod context;
pub mod folder;
pub mod item;
pub mod operations;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use access::{AccessService, RevokeRequest, ShareRequest};
pub use context::RequestContext;
pub use folder::{CreateFolderRequest, CreatedFolder, FolderService, UpdateFolderRequest};
pub use item::{CreateItemRequest, CreatedItem, ItemService, UpdateItemRequest};
pub use operations::{ResourceOperations, WrappedKey};
