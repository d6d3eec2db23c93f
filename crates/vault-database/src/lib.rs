//! # vault-database
//!
//! The resource store behind the vault: the [`VaultStore`] / [`StoreUnit`]
//! contract, its PostgreSQL implementation (pooled `sqlx` connections and
//! SQL repositories), and an in-process implementation for development and
//! tests.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::memory::MemoryVaultStore;
pub use store::postgres::PgVaultStore;
pub use store::{StoreUnit, VaultStore};
