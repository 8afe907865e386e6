//! Authorization handlers and their registry.
//!
//! A handler evaluates one requirement kind against the evaluation context.
//! Several handlers may be registered for the same kind; the engine runs all of
//! them and the requirement is satisfied if any one succeeds.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::AuthResult;
use crate::claims::Principal;
use crate::policy::handlers::{
    ClaimMembershipHandler, MinimumAgeHandler, MinimumResourceCreatedCountHandler,
    ResourceOperationHandler,
};
use crate::policy::requirement::{Requirement, RequirementKind};
use crate::storage::ResourceOwnership;
use crate::types::Resource;

// =============================================================================
// Evaluation Context
// =============================================================================

/// Everything a handler may inspect for one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// The caller.
    pub principal: &'a Principal,

    /// Target resource, for resource-scoped requirements.
    pub resource: Option<&'a Resource>,

    /// Instant the evaluation happens at. Age checks use its calendar date.
    pub request_time: OffsetDateTime,
}

impl<'a> EvaluationContext<'a> {
    /// Creates a context evaluated at the current UTC time.
    #[must_use]
    pub fn new(principal: &'a Principal, resource: Option<&'a Resource>) -> Self {
        Self {
            principal,
            resource,
            request_time: OffsetDateTime::now_utc(),
        }
    }

    /// Overrides the evaluation instant.
    #[must_use]
    pub fn at(mut self, request_time: OffsetDateTime) -> Self {
        self.request_time = request_time;
        self
    }
}

// =============================================================================
// Handler Trait
// =============================================================================

/// Evaluates requirements of one kind.
///
/// Returning `Ok(false)` means "not satisfied by this handler"; it does not
/// veto other handlers of the same kind. Malformed identity data must be
/// reported as `Ok(false)`. Errors are reserved for conditions where no
/// decision can be made (store failure, contract violation).
#[async_trait]
pub trait AuthorizationHandler: Send + Sync {
    /// Handler name for logs.
    fn name(&self) -> &str;

    /// The requirement kind this handler evaluates.
    fn kind(&self) -> RequirementKind;

    /// Evaluates `requirement` in `context`.
    ///
    /// # Errors
    ///
    /// Returns an error if the requirement cannot be evaluated at all.
    async fn handle(
        &self,
        context: &EvaluationContext<'_>,
        requirement: &Requirement,
    ) -> AuthResult<bool>;
}

// =============================================================================
// Handler Registry
// =============================================================================

/// Maps requirement kinds to their handlers, in registration order.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<RequirementKind, Vec<Arc<dyn AuthorizationHandler>>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the four built-in handlers.
    #[must_use]
    pub fn with_default_handlers(ownership: Arc<dyn ResourceOwnership>) -> Self {
        Self::new()
            .with(MinimumAgeHandler::new())
            .with(MinimumResourceCreatedCountHandler::new(ownership.clone()))
            .with(ResourceOperationHandler::new(ownership))
            .with(ClaimMembershipHandler::new())
    }

    /// Registers a handler for its kind.
    pub fn register(&mut self, handler: Arc<dyn AuthorizationHandler>) {
        self.handlers
            .entry(handler.kind())
            .or_default()
            .push(handler);
    }

    /// Registers a handler, builder style.
    #[must_use]
    pub fn with(mut self, handler: impl AuthorizationHandler + 'static) -> Self {
        self.register(Arc::new(handler));
        self
    }

    /// Handlers registered for `kind`, in registration order.
    #[must_use]
    pub fn handlers_for(&self, kind: RequirementKind) -> &[Arc<dyn AuthorizationHandler>] {
        self.handlers.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if at least one handler is registered for `kind`.
    #[must_use]
    pub fn supports(&self, kind: RequirementKind) -> bool {
        !self.handlers_for(kind).is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (kind, handlers) in &self.handlers {
            let names: Vec<&str> = handlers.iter().map(|h| h.name()).collect();
            map.entry(kind, &names);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ResourceId, UserId};

    struct NoOwnership;

    #[async_trait]
    impl ResourceOwnership for NoOwnership {
        async fn count_created_by(&self, _user_id: UserId) -> AuthResult<u64> {
            Ok(0)
        }

        async fn owner_of(&self, _resource_id: ResourceId) -> AuthResult<Option<UserId>> {
            Ok(None)
        }
    }

    struct Named(&'static str);

    #[async_trait]
    impl AuthorizationHandler for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn kind(&self) -> RequirementKind {
            RequirementKind::MinimumAge
        }

        async fn handle(
            &self,
            _context: &EvaluationContext<'_>,
            _requirement: &Requirement,
        ) -> AuthResult<bool> {
            Ok(true)
        }
    }

    #[test]
    fn test_default_handlers_cover_every_kind() {
        let registry = HandlerRegistry::with_default_handlers(Arc::new(NoOwnership));
        for kind in [
            RequirementKind::MinimumAge,
            RequirementKind::MinimumResourceCreatedCount,
            RequirementKind::ResourceOperation,
            RequirementKind::ClaimMembership,
        ] {
            assert_eq!(registry.handlers_for(kind).len(), 1, "{kind}");
        }
    }

    #[test]
    fn test_registration_order_is_kept() {
        let registry = HandlerRegistry::new().with(Named("first")).with(Named("second"));
        let names: Vec<&str> = registry
            .handlers_for(RequirementKind::MinimumAge)
            .iter()
            .map(|h| h.name())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
        assert!(!registry.supports(RequirementKind::ClaimMembership));
    }
}
