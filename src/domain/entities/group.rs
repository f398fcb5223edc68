//! Group entity and membership repository trait.
//!
//! Maps to the `groups` and `user_group` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// Reserved id of the open group every user joins at registration.
/// Seeded by the `open_group` migration.
pub const DEFAULT_GROUP_ID: Uuid = Uuid::nil();

/// A named set of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Whether this is the reserved default group.
    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_GROUP_ID
    }
}

/// Membership data access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Ids of every group the user currently belongs to.
    async fn group_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError>;
}
