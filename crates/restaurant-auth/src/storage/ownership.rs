//! Resource ownership storage trait.
//!
//! The narrow read-only view over the backing store used by authorization
//! handlers. It answers only "how many resources did this principal create"
//! and "who owns this resource".

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::{ResourceId, UserId};

/// Read-only ownership queries used during authorization.
///
/// Implementations read live data without isolation: a creation committing
/// concurrently with a count may not be observed yet.
#[async_trait]
pub trait ResourceOwnership: Send + Sync {
    /// Number of resources created by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn count_created_by(&self, user_id: UserId) -> AuthResult<u64>;

    /// Owner of `resource_id`.
    ///
    /// Returns `None` if the resource does not exist or has no recorded owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn owner_of(&self, resource_id: ResourceId) -> AuthResult<Option<UserId>>;
}
