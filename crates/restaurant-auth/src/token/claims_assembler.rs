//! Builds the claim set a token carries for a user.
//!
//! The shape is fixed: identifier, display name, role, date of birth when
//! known, nationality when non-empty. Handlers rely on exactly these.

use crate::AuthResult;
use crate::claims::{ClaimSet, DATE_FORMAT, claim_types};
use crate::error::AuthError;
use crate::storage::User;

/// Assembles the identity claims for a verified user.
///
/// # Errors
///
/// Returns `Internal` if the date of birth cannot be formatted.
pub fn assemble_claims(user: &User) -> AuthResult<ClaimSet> {
    let mut claims = ClaimSet::new()
        .with(claim_types::NAME_IDENTIFIER, user.id.to_string())
        .with(claim_types::NAME, user.display_name())
        .with(claim_types::ROLE, user.role.name.as_str());

    if let Some(date_of_birth) = user.date_of_birth {
        let formatted = date_of_birth
            .format(DATE_FORMAT)
            .map_err(|e| AuthError::internal(format!("failed to format date of birth: {e}")))?;
        claims = claims.with(claim_types::DATE_OF_BIRTH, formatted);
    }

    if let Some(nationality) = user.nationality.as_deref().filter(|n| !n.is_empty()) {
        claims = claims.with(claim_types::NATIONALITY, nationality);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::Claim;
    use crate::storage::Role;
    use time::macros::date;

    fn user() -> User {
        User::builder("jan@example.com")
            .id(7)
            .name("Jan", "Kowalski")
            .date_of_birth(date!(1990 - 05 - 07))
            .role(Role::new(1, "User"))
            .build()
    }

    #[test]
    fn test_exact_claim_shape() {
        let mut u = user();
        u.nationality = Some("Polish".to_string());

        let claims: Vec<Claim> = assemble_claims(&u).unwrap().iter().cloned().collect();
        assert_eq!(
            claims,
            vec![
                Claim::new(claim_types::NAME_IDENTIFIER, "7"),
                Claim::new(claim_types::NAME, "Jan Kowalski"),
                Claim::new(claim_types::ROLE, "User"),
                Claim::new(claim_types::DATE_OF_BIRTH, "1990-05-07"),
                Claim::new(claim_types::NATIONALITY, "Polish"),
            ]
        );
    }

    #[test]
    fn test_nationality_omitted_when_absent_or_empty() {
        let claims = assemble_claims(&user()).unwrap();
        assert_eq!(claims.len(), 4);
        assert!(claims.find_first(claim_types::NATIONALITY).is_none());

        let mut u = user();
        u.nationality = Some(String::new());
        let claims = assemble_claims(&u).unwrap();
        assert!(claims.find_first(claim_types::NATIONALITY).is_none());
    }

    #[test]
    fn test_date_of_birth_omitted_when_unknown() {
        let mut u = user();
        u.date_of_birth = None;
        let claims = assemble_claims(&u).unwrap();
        assert!(claims.find_first(claim_types::DATE_OF_BIRTH).is_none());
        assert_eq!(claims.len(), 3);
    }
}
