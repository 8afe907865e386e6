use std::sync::Arc;

use async_trait::async_trait;

use crate::AuthResult;
use crate::policy::handler::{AuthorizationHandler, EvaluationContext};
use crate::policy::requirement::{Requirement, RequirementKind};
use crate::storage::ResourceOwnership;

/// Succeeds if the principal created at least the required number of resources.
///
/// The count is a live read; a creation committing concurrently may not be seen.
pub struct MinimumResourceCreatedCountHandler {
    ownership: Arc<dyn ResourceOwnership>,
}

impl MinimumResourceCreatedCountHandler {
    /// Creates the handler over the given ownership store.
    #[must_use]
    pub fn new(ownership: Arc<dyn ResourceOwnership>) -> Self {
        Self { ownership }
    }
}

#[async_trait]
impl AuthorizationHandler for MinimumResourceCreatedCountHandler {
    fn name(&self) -> &str {
        "minimum-resource-created-count"
    }

    fn kind(&self) -> RequirementKind {
        RequirementKind::MinimumResourceCreatedCount
    }

    async fn handle(
        &self,
        context: &EvaluationContext<'_>,
        requirement: &Requirement,
    ) -> AuthResult<bool> {
        let Requirement::MinimumResourceCreatedCount { count: required } = requirement else {
            return Ok(false);
        };

        let Some(user_id) = context.principal.id() else {
            tracing::debug!("Principal has no identifier, minimum created count not met");
            return Ok(false);
        };

        let created = self.ownership.count_created_by(user_id).await?;
        let satisfied = created >= *required;

        tracing::debug!(
            principal_id = user_id,
            created,
            required = *required,
            satisfied,
            "Minimum created count evaluated"
        );
        Ok(satisfied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::Principal;
    use crate::error::AuthError;
    use crate::policy::handlers::test_support::{MockOwnership, principal};

    async fn check(store: Arc<MockOwnership>, principal: &Principal, k: u64) -> AuthResult<bool> {
        let context = EvaluationContext::new(principal, None);
        MinimumResourceCreatedCountHandler::new(store)
            .handle(&context, &Requirement::minimum_created(k))
            .await
    }

    #[tokio::test]
    async fn test_count_boundaries() {
        let store = Arc::new(MockOwnership::with_resources(&[(1, 7), (2, 7), (3, 8)]));
        let p = principal(7);

        assert!(check(store.clone(), &p, 1).await.unwrap());
        assert!(check(store.clone(), &p, 2).await.unwrap());
        assert!(!check(store.clone(), &p, 3).await.unwrap());
    }

    #[tokio::test]
    async fn test_zero_required_always_succeeds() {
        let store = Arc::new(MockOwnership::default());
        assert!(check(store, &principal(42), 0).await.unwrap());
    }

    #[tokio::test]
    async fn test_counts_only_own_resources() {
        let store = Arc::new(MockOwnership::with_resources(&[(1, 8), (2, 8)]));
        assert!(!check(store.clone(), &principal(7), 1).await.unwrap());
        assert_eq!(store.call_count(), 1);
    }

    #[tokio::test]
    async fn test_anonymous_principal_is_not_counted() {
        let store = Arc::new(MockOwnership::default());
        assert!(!check(store.clone(), &Principal::anonymous(), 0).await.unwrap());
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = Arc::new(MockOwnership::failing());
        let err = check(store, &principal(7), 1).await.unwrap_err();
        assert!(matches!(err, AuthError::Storage { .. }));
    }
}
