//! Policy-based authorization.
//!
//! - [`requirement`]: the closed set of requirement variants
//! - [`handler`]: the handler trait, evaluation context and handler registry
//! - [`handlers`]: the four built-in handlers
//! - [`registry`]: named policies fixed at startup
//! - [`engine`]: dispatch and AND/OR aggregation

pub mod engine;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod requirement;

pub use engine::{AuthorizationEngine, AuthorizationResult, EvaluatedRequirement, FailureReason};
pub use handler::{AuthorizationHandler, EvaluationContext, HandlerRegistry};
pub use handlers::{
    ClaimMembershipHandler, MinimumAgeHandler, MinimumResourceCreatedCountHandler,
    ResourceOperationHandler,
};
pub use registry::{ATLEAST_20, HAS_NATIONALITY, MINIMUM_2_CREATED, Policy, PolicyRegistry};
pub use requirement::{Requirement, RequirementKind, ResourceOperation};
