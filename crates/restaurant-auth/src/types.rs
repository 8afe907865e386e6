//! Core identifier and resource types shared across the crate.

use serde::{Deserialize, Serialize};

/// Identifier of a user (principal) in the identity store.
pub type UserId = i64;

/// Identifier of a resource guarded by ownership checks.
pub type ResourceId = i64;

/// The minimal view of a resource needed for ownership checks.
///
/// A resource loaded from the store carries its owner. A bare reference
/// (`Resource::reference`) leaves the owner unknown, and the ownership handler
/// resolves it through the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Resource identifier.
    pub id: ResourceId,

    /// Principal that created the resource, when known.
    pub created_by_id: Option<UserId>,
}

impl Resource {
    /// A resource with a known owner.
    #[must_use]
    pub fn owned_by(id: ResourceId, created_by_id: UserId) -> Self {
        Self {
            id,
            created_by_id: Some(created_by_id),
        }
    }

    /// A resource referenced by id only; the owner is looked up on demand.
    #[must_use]
    pub fn reference(id: ResourceId) -> Self {
        Self {
            id,
            created_by_id: None,
        }
    }
}
