//! Requirement variants.
//!
//! A [`Requirement`] is an immutable description of one condition a policy
//! demands. The set of variants is closed; handlers are looked up by
//! [`RequirementKind`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Operation performed on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceOperation {
    /// Create a new resource.
    Create,
    /// Read an existing resource.
    Read,
    /// Modify an existing resource.
    Update,
    /// Remove an existing resource.
    Delete,
}

impl ResourceOperation {
    /// Returns `true` if evaluating this operation needs a concrete resource.
    #[must_use]
    pub fn requires_resource(self) -> bool {
        matches!(self, Self::Update | Self::Delete)
    }

    /// Returns the operation name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Read => "Read",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

impl fmt::Display for ResourceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag identifying a requirement variant, used as the handler registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequirementKind {
    /// [`Requirement::MinimumAge`]
    MinimumAge,
    /// [`Requirement::MinimumResourceCreatedCount`]
    MinimumResourceCreatedCount,
    /// [`Requirement::ResourceOperation`]
    ResourceOperation,
    /// [`Requirement::ClaimMembership`]
    ClaimMembership,
}

impl RequirementKind {
    /// Returns the kind name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MinimumAge => "MinimumAge",
            Self::MinimumResourceCreatedCount => "MinimumResourceCreatedCount",
            Self::ResourceOperation => "ResourceOperation",
            Self::ClaimMembership => "ClaimMembership",
        }
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A condition a policy demands be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Requirement {
    /// The principal is at least `years` old.
    MinimumAge {
        /// Minimum age in whole years.
        years: u32,
    },

    /// The principal created at least `count` resources.
    MinimumResourceCreatedCount {
        /// Minimum number of created resources.
        count: u64,
    },

    /// The principal may perform `operation` on the target resource.
    ResourceOperation {
        /// The guarded operation.
        operation: ResourceOperation,
    },

    /// The principal holds a `claim_type` claim with one of `allowed_values`.
    #[serde(rename_all = "camelCase")]
    ClaimMembership {
        /// Claim type to inspect.
        claim_type: String,
        /// Accepted values.
        allowed_values: BTreeSet<String>,
    },
}

impl Requirement {
    /// Creates a `MinimumAge` requirement.
    #[must_use]
    pub fn minimum_age(years: u32) -> Self {
        Self::MinimumAge { years }
    }

    /// Creates a `MinimumResourceCreatedCount` requirement.
    #[must_use]
    pub fn minimum_created(count: u64) -> Self {
        Self::MinimumResourceCreatedCount { count }
    }

    /// Creates a `ResourceOperation` requirement.
    #[must_use]
    pub fn operation(operation: ResourceOperation) -> Self {
        Self::ResourceOperation { operation }
    }

    /// Creates a `ClaimMembership` requirement.
    #[must_use]
    pub fn claim_membership<I, S>(claim_type: impl Into<String>, allowed_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ClaimMembership {
            claim_type: claim_type.into(),
            allowed_values: allowed_values.into_iter().map(Into::into).collect(),
        }
    }

    /// The variant tag used for handler dispatch.
    #[must_use]
    pub fn kind(&self) -> RequirementKind {
        match self {
            Self::MinimumAge { .. } => RequirementKind::MinimumAge,
            Self::MinimumResourceCreatedCount { .. } => {
                RequirementKind::MinimumResourceCreatedCount
            }
            Self::ResourceOperation { .. } => RequirementKind::ResourceOperation,
            Self::ClaimMembership { .. } => RequirementKind::ClaimMembership,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinimumAge { years } => write!(f, "MinimumAge({years})"),
            Self::MinimumResourceCreatedCount { count } => {
                write!(f, "MinimumResourceCreatedCount({count})")
            }
            Self::ResourceOperation { operation } => write!(f, "ResourceOperation({operation})"),
            Self::ClaimMembership {
                claim_type,
                allowed_values,
            } => {
                let values: Vec<&str> = allowed_values.iter().map(String::as_str).collect();
                write!(f, "ClaimMembership({claim_type} in [{}])", values.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_dispatch_tags() {
        assert_eq!(
            Requirement::minimum_age(20).kind(),
            RequirementKind::MinimumAge
        );
        assert_eq!(
            Requirement::minimum_created(2).kind(),
            RequirementKind::MinimumResourceCreatedCount
        );
        assert_eq!(
            Requirement::operation(ResourceOperation::Delete).kind(),
            RequirementKind::ResourceOperation
        );
        assert_eq!(
            Requirement::claim_membership("Nationality", ["German"]).kind(),
            RequirementKind::ClaimMembership
        );
    }

    #[test]
    fn test_operations_requiring_resource() {
        assert!(!ResourceOperation::Create.requires_resource());
        assert!(!ResourceOperation::Read.requires_resource());
        assert!(ResourceOperation::Update.requires_resource());
        assert!(ResourceOperation::Delete.requires_resource());
    }

    #[test]
    fn test_display() {
        let req = Requirement::claim_membership("Nationality", ["Polish", "German"]);
        assert_eq!(req.to_string(), "ClaimMembership(Nationality in [German, Polish])");
        assert_eq!(
            Requirement::operation(ResourceOperation::Update).to_string(),
            "ResourceOperation(Update)"
        );
    }

    #[test]
    fn test_serialization_is_tagged() {
        let json = serde_json::to_value(Requirement::minimum_age(20)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "minimumAge", "years": 20 }));
    }
}
