//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vault_core::types::{RequestId, UserId};

/// Context for the current authenticated request.
///
/// Built by the transport layer once the token is validated and passed into
/// every service call so that each operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated caller.
    pub user_id: UserId,
    /// Correlation id for logs.
    pub request_id: RequestId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for a caller.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            request_id: RequestId::generate(),
            request_time: Utc::now(),
        }
    }
}
