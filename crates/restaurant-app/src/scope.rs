//! Per-request principal resolution.

use restaurant_auth::{CurrentPrincipal, Principal, TokenService};

const BEARER_PREFIX: &str = "Bearer ";

/// The principal of one inbound operation.
///
/// Built from the optional `Authorization` header value. A missing, malformed,
/// expired or forged credential yields the anonymous principal, which every
/// policy then rejects.
#[derive(Debug, Clone)]
pub struct RequestScope {
    principal: Principal,
}

impl RequestScope {
    pub fn from_authorization(tokens: &TokenService, header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Self::anonymous();
        };
        let Some(token) = header.strip_prefix(BEARER_PREFIX).map(str::trim) else {
            tracing::debug!("Authorization header is not a bearer credential");
            return Self::anonymous();
        };

        match tokens.verify(token) {
            Ok(principal) => Self { principal },
            Err(e) => {
                tracing::debug!(error = %e, category = %e.category(), "Bearer token rejected");
                Self::anonymous()
            }
        }
    }

    pub fn anonymous() -> Self {
        Self {
            principal: Principal::anonymous(),
        }
    }
}

impl CurrentPrincipal for RequestScope {
    fn principal(&self) -> &Principal {
        &self.principal
    }
}
