//! Grant policy configuration.

use serde::{Deserialize, Serialize};

/// What a share does when the target user already holds a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantConflictPolicy {
    /// Replace the wrapped key and access level of the existing grant.
    Upsert,
    /// Fail with `KeyConflict`.
    Reject,
}

/// Sharing behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingConfig {
    /// Policy applied when re-sharing to an already-granted user.
    #[serde(default = "default_policy")]
    pub on_existing_grant: GrantConflictPolicy,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            on_existing_grant: default_policy(),
        }
    }
}

fn default_policy() -> GrantConflictPolicy {
    GrantConflictPolicy::Upsert
}
