use async_trait::async_trait;
use time::{Date, Month};

use crate::AuthResult;
use crate::policy::handler::{AuthorizationHandler, EvaluationContext};
use crate::policy::requirement::{Requirement, RequirementKind};

/// Succeeds if `date_of_birth + years <= today`.
///
/// A missing or unparsable date of birth denies the requirement.
#[derive(Debug, Default)]
pub struct MinimumAgeHandler;

impl MinimumAgeHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Adds whole years on the civil calendar. Feb 29 maps to Feb 28 in
/// non-leap target years.
fn add_years(date: Date, years: u32) -> Option<Date> {
    let year = date.year().checked_add(i32::try_from(years).ok()?)?;
    match Date::from_calendar_date(year, date.month(), date.day()) {
        Ok(reached) => Some(reached),
        Err(_) if date.month() == Month::February && date.day() == 29 => {
            Date::from_calendar_date(year, Month::February, 28).ok()
        }
        Err(_) => None,
    }
}

#[async_trait]
impl AuthorizationHandler for MinimumAgeHandler {
    fn name(&self) -> &str {
        "minimum-age"
    }

    fn kind(&self) -> RequirementKind {
        RequirementKind::MinimumAge
    }

    async fn handle(
        &self,
        context: &EvaluationContext<'_>,
        requirement: &Requirement,
    ) -> AuthResult<bool> {
        let Requirement::MinimumAge { years } = requirement else {
            return Ok(false);
        };

        let principal = context.principal;
        let name = principal.display_name().unwrap_or("<unknown>");

        let date_of_birth = match principal.parse_date_of_birth() {
            Ok(date) => date,
            Err(e) => {
                tracing::info!(user = %name, error = %e, "Authorization failed");
                return Ok(false);
            }
        };

        tracing::info!(user = %name, date_of_birth = %date_of_birth, "Evaluating minimum age");

        let today = context.request_time.date();
        let satisfied = add_years(date_of_birth, *years).is_some_and(|reached| reached <= today);

        if satisfied {
            tracing::info!(user = %name, "Authorization succeeded");
        } else {
            tracing::info!(user = %name, "Authorization failed");
        }

        Ok(satisfied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{ClaimSet, Principal, claim_types};
    use crate::policy::handlers::test_support::{principal, principal_with};
    use time::macros::{date, datetime};
    use time::{Duration, OffsetDateTime, Time};

    async fn check(principal: &Principal, years: u32, today: Date) -> bool {
        let now = OffsetDateTime::new_utc(today, Time::MIDNIGHT);
        let context = EvaluationContext::new(principal, None).at(now);
        MinimumAgeHandler::new()
            .handle(&context, &Requirement::minimum_age(years))
            .await
            .unwrap()
    }

    fn born(date: &str) -> Principal {
        principal_with(1, &[(claim_types::DATE_OF_BIRTH, date)])
    }

    #[tokio::test]
    async fn test_twentieth_birthday_counts() {
        let p = born("2000-01-01");
        assert!(check(&p, 20, date!(2020 - 01 - 01)).await);
        assert!(!check(&p, 20, date!(2019 - 12 - 31)).await);
    }

    #[tokio::test]
    async fn test_boundary_for_various_ages() {
        let today = date!(2024 - 06 - 15);
        for years in [0u32, 1, 18, 20, 65] {
            let birth =
                Date::from_calendar_date(today.year() - years as i32, today.month(), today.day())
                    .unwrap();

            let on_boundary = born(&birth.to_string());
            assert!(check(&on_boundary, years, today).await, "exact {years}");

            let older = born(&(birth - Duration::days(1)).to_string());
            assert!(check(&older, years, today).await, "older {years}");

            let younger = born(&(birth + Duration::days(1)).to_string());
            assert!(!check(&younger, years, today).await, "younger {years}");
        }
    }

    #[tokio::test]
    async fn test_leap_day_birthday() {
        let p = born("2004-02-29");
        assert!(check(&p, 1, date!(2005 - 02 - 28)).await);
        assert!(!check(&p, 1, date!(2005 - 02 - 27)).await);
        assert!(check(&p, 4, date!(2008 - 02 - 29)).await);
    }

    #[tokio::test]
    async fn test_missing_date_of_birth_denies() {
        assert!(!check(&principal(1), 0, date!(2024 - 01 - 01)).await);
    }

    #[tokio::test]
    async fn test_unparsable_date_of_birth_denies() {
        assert!(!check(&born("yesterday"), 0, date!(2024 - 01 - 01)).await);
        assert!(!check(&born("2000-13-45"), 0, date!(2024 - 01 - 01)).await);
    }

    #[tokio::test]
    async fn test_uses_request_time_date() {
        let claims = ClaimSet::new()
            .with(claim_types::NAME_IDENTIFIER, "1")
            .with(claim_types::NAME, "x")
            .with(claim_types::DATE_OF_BIRTH, "2000-01-01");
        let p = Principal::authenticated(claims).unwrap();
        let context =
            EvaluationContext::new(&p, None).at(datetime!(2020-01-01 23:59:59 UTC));
        let ok = MinimumAgeHandler::new()
            .handle(&context, &Requirement::minimum_age(20))
            .await
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn test_add_years() {
        assert_eq!(add_years(date!(2000 - 01 - 01), 20), Some(date!(2020 - 01 - 01)));
        assert_eq!(add_years(date!(2000 - 02 - 29), 1), Some(date!(2001 - 02 - 28)));
        assert_eq!(add_years(date!(9999 - 01 - 01), 1), None);
    }
}
