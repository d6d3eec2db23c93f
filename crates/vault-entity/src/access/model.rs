//! Grant (resource key) records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use vault_core::types::UserId;

use super::{AccessLevel, ResourceKind};

/// One user's access to one resource: the resource key wrapped for that
/// user plus the level it confers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ResourceKey {
    /// Folder or item id.
    pub resource_id: Uuid,
    /// Which table `resource_id` refers to.
    pub resource_kind: ResourceKind,
    /// Grantee.
    pub user_id: UserId,
    /// Resource key wrapped for `user_id`.
    pub enc_key: Vec<u8>,
    /// Nonce used when wrapping `enc_key`.
    pub nonce: Vec<u8>,
    /// Level conferred.
    pub access_level: AccessLevel,
    /// When the grant was first issued.
    pub created_at: DateTime<Utc>,
    /// When the wrapped key or level last changed.
    pub updated_at: DateTime<Utc>,
}

/// Data required to issue a grant.
#[derive(Debug, Clone)]
pub struct NewResourceKey {
    pub resource_id: Uuid,
    pub resource_kind: ResourceKind,
    pub user_id: UserId,
    pub enc_key: Vec<u8>,
    pub nonce: Vec<u8>,
    pub access_level: AccessLevel,
}

/// Grant summary shown to owners; never carries key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Grant {
    pub user_id: UserId,
    pub access_level: AccessLevel,
    pub created_at: DateTime<Utc>,
}

impl From<&ResourceKey> for Grant {
    fn from(key: &ResourceKey) -> Self {
        Self {
            user_id: key.user_id,
            access_level: key.access_level,
            created_at: key.created_at,
        }
    }
}
