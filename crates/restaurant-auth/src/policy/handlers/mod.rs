//! Built-in authorization handlers, one per requirement kind.

mod claim_membership;
mod minimum_age;
mod minimum_created;
mod resource_operation;

pub use claim_membership::ClaimMembershipHandler;
pub use minimum_age::MinimumAgeHandler;
pub use minimum_created::MinimumResourceCreatedCountHandler;
pub use resource_operation::ResourceOperationHandler;
