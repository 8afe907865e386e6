//! Named policies, fixed at process start.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::AuthResult;
use crate::claims::claim_types;
use crate::error::AuthError;
use crate::policy::requirement::{Requirement, RequirementKind};

/// Principal must hold a German or Polish nationality claim.
pub const HAS_NATIONALITY: &str = "HasNationality";

/// Principal must be at least 20 years old.
pub const ATLEAST_20: &str = "Atleast20";

/// Principal must have created at least 2 restaurants.
pub const MINIMUM_2_CREATED: &str = "Minimum2Created";

/// A named set of requirements, all of which must be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Policy name, unique within a registry.
    pub name: String,

    /// Requirements in registration order.
    pub requirements: Vec<Requirement>,
}

impl Policy {
    /// Creates a policy with no requirements.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirements: Vec::new(),
        }
    }

    /// Adds a requirement, builder style.
    #[must_use]
    pub fn require(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Distinct requirement kinds used by this policy.
    pub fn kinds(&self) -> impl Iterator<Item = RequirementKind> + '_ {
        let mut seen = Vec::new();
        self.requirements.iter().filter_map(move |r| {
            let kind = r.kind();
            if seen.contains(&kind) {
                None
            } else {
                seen.push(kind);
                Some(kind)
            }
        })
    }
}

/// Lookup table of policies by name.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: HashMap<String, Policy>,
}

impl PolicyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `HasNationality`, `Atleast20` and `Minimum2Created`.
    #[must_use]
    pub fn restaurant_defaults() -> Self {
        let policies = [
            Policy::new(HAS_NATIONALITY).require(Requirement::claim_membership(
                claim_types::NATIONALITY,
                ["German", "Polish"],
            )),
            Policy::new(ATLEAST_20).require(Requirement::minimum_age(20)),
            Policy::new(MINIMUM_2_CREATED).require(Requirement::minimum_created(2)),
        ];

        Self {
            policies: policies
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
        }
    }

    /// Registers a policy.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if a policy with the same name already exists.
    pub fn register(&mut self, policy: Policy) -> AuthResult<()> {
        if self.policies.contains_key(&policy.name) {
            return Err(AuthError::configuration(format!(
                "policy '{}' is already registered",
                policy.name
            )));
        }
        self.policies.insert(policy.name.clone(), policy);
        Ok(())
    }

    /// Registers a policy, builder style.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if a policy with the same name already exists.
    pub fn with(mut self, policy: Policy) -> AuthResult<Self> {
        self.register(policy)?;
        Ok(self)
    }

    /// Looks up a policy by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Policy> {
        self.policies.get(name)
    }

    /// Iterates over all registered policies, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Policy> {
        self.policies.values()
    }

    /// Number of registered policies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Returns `true` if no policy is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restaurant_defaults() {
        let registry = PolicyRegistry::restaurant_defaults();
        assert_eq!(registry.len(), 3);

        assert_eq!(
            registry.get(HAS_NATIONALITY).unwrap().requirements,
            vec![Requirement::claim_membership("Nationality", ["Polish", "German"])]
        );
        assert_eq!(
            registry.get(ATLEAST_20).unwrap().requirements,
            vec![Requirement::minimum_age(20)]
        );
        assert_eq!(
            registry.get(MINIMUM_2_CREATED).unwrap().requirements,
            vec![Requirement::minimum_created(2)]
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = PolicyRegistry::restaurant_defaults();
        let err = registry.register(Policy::new(ATLEAST_20)).unwrap_err();
        assert!(matches!(err, AuthError::Configuration { .. }));
        assert_eq!(
            registry.get(ATLEAST_20).unwrap().requirements,
            vec![Requirement::minimum_age(20)]
        );
    }

    #[test]
    fn test_unknown_policy_lookup() {
        assert!(PolicyRegistry::new().get("Atleast21").is_none());
    }

    #[test]
    fn test_policy_kinds_are_distinct() {
        let policy = Policy::new("Adult")
            .require(Requirement::minimum_age(18))
            .require(Requirement::minimum_age(21))
            .require(Requirement::minimum_created(1));
        let kinds: Vec<_> = policy.kinds().collect();
        assert_eq!(
            kinds,
            vec![
                RequirementKind::MinimumAge,
                RequirementKind::MinimumResourceCreatedCount
            ]
        );
    }
}
