use std::sync::Arc;

use async_trait::async_trait;

use crate::AuthResult;
use crate::error::AuthError;
use crate::policy::handler::{AuthorizationHandler, EvaluationContext};
use crate::policy::requirement::{Requirement, RequirementKind};
use crate::storage::ResourceOwnership;

/// Ownership gate for resource operations.
///
/// | Operation | Rule |
/// |---|---|
/// | Create, Read | any authenticated principal |
/// | Update, Delete | the resource's creator only |
///
/// There is no administrative override.
pub struct ResourceOperationHandler {
    ownership: Arc<dyn ResourceOwnership>,
}

impl ResourceOperationHandler {
    /// Creates the handler over the given ownership store.
    #[must_use]
    pub fn new(ownership: Arc<dyn ResourceOwnership>) -> Self {
        Self { ownership }
    }
}

#[async_trait]
impl AuthorizationHandler for ResourceOperationHandler {
    fn name(&self) -> &str {
        "resource-operation"
    }

    fn kind(&self) -> RequirementKind {
        RequirementKind::ResourceOperation
    }

    async fn handle(
        &self,
        context: &EvaluationContext<'_>,
        requirement: &Requirement,
    ) -> AuthResult<bool> {
        let Requirement::ResourceOperation { operation } = requirement else {
            return Ok(false);
        };
        let principal = context.principal;

        if !operation.requires_resource() {
            return Ok(principal.is_authenticated());
        }

        let resource = context.resource.ok_or_else(|| {
            AuthError::configuration(format!("{operation} requirement evaluated without a resource"))
        })?;

        let owner = match resource.created_by_id {
            Some(owner) => Some(owner),
            None => self.ownership.owner_of(resource.id).await?,
        };

        let satisfied = match (owner, principal.id()) {
            (Some(owner), Some(caller)) => owner == caller,
            _ => false,
        };

        tracing::debug!(
            resource_id = resource.id,
            owner = ?owner,
            principal_id = ?principal.id(),
            operation = %operation,
            satisfied,
            "Resource ownership evaluated"
        );
        Ok(satisfied)
    }
}
