//! Claims-based identity model.
//!
//! A [`Principal`] is the read-only view of the caller for one operation: an
//! ordered list of [`Claim`]s plus an authenticated flag. It is built once from a
//! verified credential (or as [`Principal::anonymous`]) and never mutated.

use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::AuthResult;
use crate::error::AuthError;
use crate::types::UserId;

/// Well-known claim types.
pub mod claim_types {
    /// The principal's unique identifier.
    pub const NAME_IDENTIFIER: &str = "NameIdentifier";
    /// Display name ("First Last").
    pub const NAME: &str = "Name";
    /// Role name.
    pub const ROLE: &str = "Role";
    /// Date of birth, `yyyy-MM-dd`.
    pub const DATE_OF_BIRTH: &str = "DateOfBirth";
    /// Nationality, only present when known.
    pub const NATIONALITY: &str = "Nationality";
}

/// Calendar date format used by the date-of-birth claim.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A typed attribute asserted about a principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    /// Claim type, e.g. [`claim_types::ROLE`].
    #[serde(rename = "type")]
    pub claim_type: String,

    /// Claim value.
    pub value: String,
}

impl Claim {
    /// Creates a new claim.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// Ordered collection of claims. Several claims may share a type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet {
    claims: Vec<Claim>,
}

impl ClaimSet {
    /// Creates an empty claim set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a claim.
    pub fn push(&mut self, claim: Claim) {
        self.claims.push(claim);
    }

    /// Appends a claim, builder style.
    #[must_use]
    pub fn with(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Claim::new(claim_type, value));
        self
    }

    /// Returns the first claim value of the given type.
    #[must_use]
    pub fn find_first(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    /// Returns every claim value of the given type, in order.
    pub fn find_all<'a>(&'a self, claim_type: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.claims
            .iter()
            .filter(move |c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    /// Iterates over all claims.
    pub fn iter(&self) -> impl Iterator<Item = &Claim> {
        self.claims.iter()
    }

    /// Number of claims.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Returns `true` if there are no claims.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

impl FromIterator<Claim> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = Claim>>(iter: I) -> Self {
        Self {
            claims: iter.into_iter().collect(),
        }
    }
}

/// The authenticated (or anonymous) identity making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    claims: ClaimSet,
    authenticated: bool,
}

impl Principal {
    /// Builds an authenticated principal from verified claims.
    ///
    /// # Errors
    ///
    /// Returns `MalformedClaim` if the identifier or display name claim is
    /// missing, or the identifier is not numeric.
    pub fn authenticated(claims: ClaimSet) -> AuthResult<Self> {
        let id = claims
            .find_first(claim_types::NAME_IDENTIFIER)
            .ok_or_else(|| AuthError::malformed_claim(claim_types::NAME_IDENTIFIER, "missing"))?;
        id.trim().parse::<UserId>().map_err(|_| {
            AuthError::malformed_claim(claim_types::NAME_IDENTIFIER, "not a numeric identifier")
        })?;
        if claims.find_first(claim_types::NAME).is_none() {
            return Err(AuthError::malformed_claim(claim_types::NAME, "missing"));
        }

        Ok(Self {
            claims,
            authenticated: true,
        })
    }

    /// The principal used when no verified credential was presented.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            claims: ClaimSet::new(),
            authenticated: false,
        }
    }

    /// Returns `true` if this principal comes from a verified credential.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// All claims, in issue order.
    #[must_use]
    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    /// The principal's identifier.
    #[must_use]
    pub fn id(&self) -> Option<UserId> {
        self.claims
            .find_first(claim_types::NAME_IDENTIFIER)
            .and_then(|v| v.trim().parse().ok())
    }

    /// Display name.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.claims.find_first(claim_types::NAME)
    }

    /// Role name.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.claims.find_first(claim_types::ROLE)
    }

    /// Nationality, if the principal has one.
    #[must_use]
    pub fn nationality(&self) -> Option<&str> {
        self.claims.find_first(claim_types::NATIONALITY)
    }

    /// Date of birth, `None` when absent or unparsable.
    #[must_use]
    pub fn date_of_birth(&self) -> Option<Date> {
        self.parse_date_of_birth().ok()
    }

    /// Parses the date-of-birth claim.
    ///
    /// Surrounding whitespace is tolerated.
    ///
    /// # Errors
    ///
    /// Returns `MalformedClaim` if the claim is missing or not a `yyyy-MM-dd` date.
    pub fn parse_date_of_birth(&self) -> AuthResult<Date> {
        let raw = self
            .claims
            .find_first(claim_types::DATE_OF_BIRTH)
            .ok_or_else(|| AuthError::malformed_claim(claim_types::DATE_OF_BIRTH, "missing"))?;
        Date::parse(raw.trim(), DATE_FORMAT)
            .map_err(|e| AuthError::malformed_claim(claim_types::DATE_OF_BIRTH, e.to_string()))
    }

    /// Returns `true` if the principal holds a claim of `claim_type` with `value`.
    #[must_use]
    pub fn has_claim(&self, claim_type: &str, value: &str) -> bool {
        self.claims.find_all(claim_type).any(|v| v == value)
    }
}

/// Access to the principal of the current operation scope.
pub trait CurrentPrincipal: Send + Sync {
    /// The principal decoded from the caller's verified credential.
    fn principal(&self) -> &Principal;

    /// Shortcut for the principal's identifier.
    fn user_id(&self) -> Option<UserId> {
        self.principal().id()
    }
}

impl CurrentPrincipal for Principal {
    fn principal(&self) -> &Principal {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn claims() -> ClaimSet {
        ClaimSet::new()
            .with(claim_types::NAME_IDENTIFIER, "7")
            .with(claim_types::NAME, "Jan Kowalski")
            .with(claim_types::ROLE, "User")
            .with(claim_types::DATE_OF_BIRTH, "2000-01-01")
    }

    #[test]
    fn test_authenticated_principal_accessors() {
        let principal = Principal::authenticated(claims()).unwrap();
        assert!(principal.is_authenticated());
        assert_eq!(principal.id(), Some(7));
        assert_eq!(principal.display_name(), Some("Jan Kowalski"));
        assert_eq!(principal.role(), Some("User"));
        assert_eq!(principal.date_of_birth(), Some(date!(2000 - 01 - 01)));
        assert_eq!(principal.nationality(), None);
        assert_eq!(principal.user_id(), Some(7));
    }

    #[test]
    fn test_authenticated_requires_identifier_and_name() {
        let no_id = ClaimSet::new().with(claim_types::NAME, "x");
        assert!(matches!(
            Principal::authenticated(no_id),
            Err(AuthError::MalformedClaim { .. })
        ));

        let no_name = ClaimSet::new().with(claim_types::NAME_IDENTIFIER, "1");
        assert!(matches!(
            Principal::authenticated(no_name),
            Err(AuthError::MalformedClaim { .. })
        ));

        let bad_id = ClaimSet::new()
            .with(claim_types::NAME_IDENTIFIER, "abc")
            .with(claim_types::NAME, "x");
        assert!(Principal::authenticated(bad_id).is_err());
    }

    #[test]
    fn test_anonymous_principal() {
        let principal = Principal::anonymous();
        assert!(!principal.is_authenticated());
        assert!(principal.id().is_none());
        assert!(principal.claims().is_empty());
    }

    #[test]
    fn test_date_of_birth_tolerates_trailing_space() {
        let set = ClaimSet::new()
            .with(claim_types::NAME_IDENTIFIER, "1")
            .with(claim_types::NAME, "x")
            .with(claim_types::DATE_OF_BIRTH, "1990-05-17 ");
        let principal = Principal::authenticated(set).unwrap();
        assert_eq!(principal.date_of_birth(), Some(date!(1990 - 05 - 17)));
    }

    #[test]
    fn test_malformed_date_of_birth() {
        let set = ClaimSet::new()
            .with(claim_types::NAME_IDENTIFIER, "1")
            .with(claim_types::NAME, "x")
            .with(claim_types::DATE_OF_BIRTH, "17/05/1990");
        let principal = Principal::authenticated(set).unwrap();
        assert!(principal.date_of_birth().is_none());
        assert!(matches!(
            principal.parse_date_of_birth(),
            Err(AuthError::MalformedClaim { .. })
        ));
    }

    #[test]
    fn test_multiple_claims_of_same_type() {
        let set = claims()
            .with(claim_types::NATIONALITY, "French")
            .with(claim_types::NATIONALITY, "Polish");
        let principal = Principal::authenticated(set).unwrap();
        assert_eq!(principal.nationality(), Some("French"));
        assert!(principal.has_claim(claim_types::NATIONALITY, "Polish"));
        assert!(!principal.has_claim(claim_types::NATIONALITY, "German"));
        assert_eq!(
            principal.claims().find_all(claim_types::NATIONALITY).count(),
            2
        );
    }
}
