use async_trait::async_trait;

use crate::AuthResult;
use crate::policy::handler::{AuthorizationHandler, EvaluationContext};
use crate::policy::requirement::{Requirement, RequirementKind};

/// Succeeds if the principal holds a claim of the required type whose value
/// is in the allowed set.
#[derive(Debug, Default)]
pub struct ClaimMembershipHandler;

impl ClaimMembershipHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuthorizationHandler for ClaimMembershipHandler {
    fn name(&self) -> &str {
        "claim-membership"
    }

    fn kind(&self) -> RequirementKind {
        RequirementKind::ClaimMembership
    }

    async fn handle(
        &self,
        context: &EvaluationContext<'_>,
        requirement: &Requirement,
    ) -> AuthResult<bool> {
        let Requirement::ClaimMembership {
            claim_type,
            allowed_values,
        } = requirement
        else {
            return Ok(false);
        };

        let satisfied = context
            .principal
            .claims()
            .find_all(claim_type)
            .any(|value| allowed_values.contains(value));

        tracing::debug!(claim_type = %claim_type, satisfied, "Claim membership evaluated");
        Ok(satisfied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{Principal, claim_types};
    use crate::policy::handlers::test_support::{principal, principal_with};

    fn nationality_requirement() -> Requirement {
        Requirement::claim_membership(claim_types::NATIONALITY, ["German", "Polish"])
    }

    async fn check(principal: &Principal) -> bool {
        let context = EvaluationContext::new(principal, None);
        ClaimMembershipHandler::new()
            .handle(&context, &nationality_requirement())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_allowed_value_succeeds() {
        assert!(check(&principal_with(1, &[(claim_types::NATIONALITY, "Polish")])).await);
        assert!(check(&principal_with(1, &[(claim_types::NATIONALITY, "German")])).await);
    }

    #[tokio::test]
    async fn test_other_value_fails() {
        assert!(!check(&principal_with(1, &[(claim_types::NATIONALITY, "French")])).await);
    }

    #[tokio::test]
    async fn test_missing_claim_fails() {
        assert!(!check(&principal(1)).await);
    }

    #[tokio::test]
    async fn test_any_matching_claim_suffices() {
        let p = principal_with(
            1,
            &[
                (claim_types::NATIONALITY, "French"),
                (claim_types::NATIONALITY, "German"),
            ],
        );
        assert!(check(&p).await);
    }

    #[tokio::test]
    async fn test_value_comparison_is_exact() {
        assert!(!check(&principal_with(1, &[(claim_types::NATIONALITY, "polish")])).await);
    }
}
