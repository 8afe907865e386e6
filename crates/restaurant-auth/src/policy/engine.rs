//! Authorization engine.
//!
//! Looks up a policy, fans every requirement out to all handlers registered
//! for its kind, and aggregates:
//!
//! - a requirement is satisfied if **any** of its handlers succeeds,
//! - a policy succeeds only if **every** requirement is satisfied.
//!
//! Handlers never short-circuit each other. Unauthenticated principals fail
//! before any handler runs.
//!
//! # Example
//!
//! ```ignore
//! use restaurant_auth::policy::{AuthorizationEngine, HandlerRegistry, PolicyRegistry};
//!
//! let engine = AuthorizationEngine::new(
//!     PolicyRegistry::restaurant_defaults(),
//!     HandlerRegistry::with_default_handlers(store.clone()),
//! )?;
//!
//! engine.authorize(&principal, "Atleast20", None).await?;
//! ```

use std::time::Instant;

use serde::Serialize;
use time::OffsetDateTime;

use crate::AuthResult;
use crate::claims::Principal;
use crate::config::AuditConfig;
use crate::error::AuthError;
use crate::policy::handler::{EvaluationContext, HandlerRegistry};
use crate::policy::registry::PolicyRegistry;
use crate::policy::requirement::{Requirement, ResourceOperation};
use crate::types::Resource;

// =============================================================================
// Authorization Result
// =============================================================================

/// Why an evaluation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureReason {
    /// No verified principal; no handler was run.
    Unauthenticated,
    /// At least one requirement was not satisfied.
    RequirementsNotMet,
}

/// Audit record for one requirement.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedRequirement {
    /// The requirement.
    pub requirement: Requirement,

    /// Number of handlers that ran for it.
    pub handlers_run: usize,

    /// Whether at least one handler succeeded.
    pub satisfied: bool,
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationResult {
    /// Overall decision.
    pub succeeded: bool,

    /// Failure cause, `None` on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,

    /// Per-requirement records, in policy order.
    pub evaluated: Vec<EvaluatedRequirement>,

    /// Time taken to evaluate (milliseconds).
    pub evaluation_time_ms: f64,
}

impl AuthorizationResult {
    fn unauthenticated(start: Instant) -> Self {
        Self {
            succeeded: false,
            failure: Some(FailureReason::Unauthenticated),
            evaluated: Vec::new(),
            evaluation_time_ms: elapsed_ms(start),
        }
    }

    /// Returns `true` if access was granted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.succeeded
    }

    /// Requirements that were not satisfied.
    pub fn unmet_requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.evaluated
            .iter()
            .filter(|e| !e.satisfied)
            .map(|e| &e.requirement)
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// =============================================================================
// Authorization Engine
// =============================================================================

/// Evaluates named policies and ad hoc requirement lists.
///
/// Both registries are fixed once the engine is built; share it behind an
/// `Arc`.
#[derive(Debug)]
pub struct AuthorizationEngine {
    policies: PolicyRegistry,
    handlers: HandlerRegistry,
    audit: AuditConfig,
}

impl AuthorizationEngine {
    /// Creates an engine after checking every policy can be evaluated.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if a registered policy uses a requirement kind
    /// that has no handler.
    pub fn new(policies: PolicyRegistry, handlers: HandlerRegistry) -> AuthResult<Self> {
        for policy in policies.iter() {
            if let Some(kind) = policy.kinds().find(|kind| !handlers.supports(*kind)) {
                return Err(AuthError::configuration(format!(
                    "policy '{}' uses requirement kind {kind} with no registered handler",
                    policy.name
                )));
            }
        }

        tracing::debug!(policies = policies.len(), "Authorization engine initialized");

        Ok(Self {
            policies,
            handlers,
            audit: AuditConfig::default(),
        })
    }

    /// Sets the audit configuration.
    #[must_use]
    pub fn with_audit(mut self, audit: AuditConfig) -> Self {
        self.audit = audit;
        self
    }

    /// The registered policies.
    #[must_use]
    pub fn policies(&self) -> &PolicyRegistry {
        &self.policies
    }

    /// Evaluates a named policy at the current time.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for an unknown policy name or a resource-scoped
    /// requirement without a resource, and `Storage` if a handler cannot read
    /// the backing store. A denial is a successful call with
    /// `succeeded == false`.
    pub async fn evaluate(
        &self,
        principal: &Principal,
        policy_name: &str,
        resource: Option<&Resource>,
    ) -> AuthResult<AuthorizationResult> {
        self.evaluate_at(principal, policy_name, resource, OffsetDateTime::now_utc())
            .await
    }

    /// Evaluates a named policy at a fixed instant.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate`](Self::evaluate).
    pub async fn evaluate_at(
        &self,
        principal: &Principal,
        policy_name: &str,
        resource: Option<&Resource>,
        request_time: OffsetDateTime,
    ) -> AuthResult<AuthorizationResult> {
        let policy = self.policies.get(policy_name).ok_or_else(|| {
            AuthError::configuration(format!("policy '{policy_name}' is not registered"))
        })?;

        let context = EvaluationContext::new(principal, resource).at(request_time);
        self.evaluate_with_context(&context, &policy.name, &policy.requirements)
            .await
    }

    /// Evaluates requirements that are not registered as a named policy.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if a requirement kind has no handler, plus the
    /// errors of [`evaluate`](Self::evaluate).
    pub async fn evaluate_requirements(
        &self,
        principal: &Principal,
        requirements: &[Requirement],
        resource: Option<&Resource>,
    ) -> AuthResult<AuthorizationResult> {
        let context = EvaluationContext::new(principal, resource);
        let label = requirements
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" && ");
        self.evaluate_with_context(&context, &label, requirements)
            .await
    }

    /// Runs `requirements` against `context`. `label` names the policy in logs.
    ///
    /// # Errors
    ///
    /// See [`evaluate_requirements`](Self::evaluate_requirements).
    pub async fn evaluate_with_context(
        &self,
        context: &EvaluationContext<'_>,
        label: &str,
        requirements: &[Requirement],
    ) -> AuthResult<AuthorizationResult> {
        let start = Instant::now();
        let principal = context.principal;
        let resource_id = context.resource.map(|r| r.id);

        if !principal.is_authenticated() {
            if self.audit.log_access_decisions {
                tracing::info!(
                    policy = %label,
                    resource_id = ?resource_id,
                    "Access denied: unauthenticated"
                );
            }
            return Ok(AuthorizationResult::unauthenticated(start));
        }

        let mut evaluated = Vec::with_capacity(requirements.len());
        for requirement in requirements {
            let handlers = self.handlers.handlers_for(requirement.kind());
            if handlers.is_empty() {
                return Err(AuthError::configuration(format!(
                    "no handler registered for requirement kind {}",
                    requirement.kind()
                )));
            }

            let mut satisfied = false;
            for handler in handlers {
                let ok = handler.handle(context, requirement).await?;
                tracing::trace!(
                    handler = handler.name(),
                    requirement = %requirement,
                    ok,
                    "Handler evaluated"
                );
                satisfied |= ok;
            }

            evaluated.push(EvaluatedRequirement {
                requirement: requirement.clone(),
                handlers_run: handlers.len(),
                satisfied,
            });
        }

        let succeeded = evaluated.iter().all(|e| e.satisfied);
        let result = AuthorizationResult {
            succeeded,
            failure: (!succeeded).then_some(FailureReason::RequirementsNotMet),
            evaluated,
            evaluation_time_ms: elapsed_ms(start),
        };

        if succeeded {
            tracing::debug!(
                principal_id = ?principal.id(),
                policy = %label,
                resource_id = ?resource_id,
                "Access granted"
            );
        } else if self.audit.log_access_decisions {
            let unmet: Vec<String> = result.unmet_requirements().map(ToString::to_string).collect();
            tracing::info!(
                principal_id = ?principal.id(),
                policy = %label,
                resource_id = ?resource_id,
                unmet = ?unmet,
                "Access denied"
            );
        }

        Ok(result)
    }

    /// Evaluates a named policy and converts a denial into an error.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` or `Forbidden` on denial, plus the errors of
    /// [`evaluate`](Self::evaluate).
    pub async fn authorize(
        &self,
        principal: &Principal,
        policy_name: &str,
        resource: Option<&Resource>,
    ) -> AuthResult<()> {
        let result = self.evaluate(principal, policy_name, resource).await?;
        into_decision(result, || format!("policy '{policy_name}' denied access"))
    }

    /// Checks a single resource operation, converting a denial into an error.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` or `Forbidden` on denial, `Configuration` if
    /// `Update`/`Delete` is checked without a resource.
    pub async fn authorize_operation(
        &self,
        principal: &Principal,
        operation: ResourceOperation,
        resource: Option<&Resource>,
    ) -> AuthResult<()> {
        let requirements = [Requirement::operation(operation)];
        let result = self
            .evaluate_requirements(principal, &requirements, resource)
            .await?;
        into_decision(result, || format!("{operation} not permitted"))
    }
}

fn into_decision(result: AuthorizationResult, message: impl FnOnce() -> String) -> AuthResult<()> {
    match result.failure {
        None => Ok(()),
        Some(FailureReason::Unauthenticated) => Err(AuthError::Unauthenticated),
        Some(FailureReason::RequirementsNotMet) => Err(AuthError::forbidden(message())),
    }
}
