//! SQL repositories for folders, items, and resource keys.
//!
//! Every function is generic over [`sqlx::PgExecutor`] so the same query
//! runs against the pool for standalone reads or against an open
//! transaction inside an atomic unit.

pub mod folder;
pub mod item;
pub mod resource;
pub mod resource_key;

pub use folder::FolderRepository;
pub use item::ItemRepository;
pub use resource::ResourceRepository;
pub use resource_key::ResourceKeyRepository;

use vault_entity::ResourceKind;

/// Table holding rows of the given kind.
pub(crate) fn table_for(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Folder => "folders",
        ResourceKind::Item => "items",
    }
}
