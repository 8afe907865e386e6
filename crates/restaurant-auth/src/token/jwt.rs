//! HS256 token issuing and verification.
//!
//! Issuer doubles as audience. The payload carries the identity claims under
//! their claim-type names plus `iss`, `aud`, `iat`, `exp` and `jti`.
//!
//! ## Example
//!
//! ```ignore
//! use restaurant_auth::token::{TokenService, assemble_claims};
//!
//! let tokens = TokenService::new(&config.auth.token);
//! let token = tokens.issue(&assemble_claims(&user)?)?;
//! let principal = tokens.verify(&token)?;
//! ```

use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AuthResult;
use crate::claims::{ClaimSet, Principal, claim_types};
use crate::config::TokenConfig;
use crate::error::AuthError;

// ============================================================================
// Token Claims
// ============================================================================

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User identifier.
    #[serde(rename = "NameIdentifier")]
    pub name_identifier: String,

    /// Display name.
    #[serde(rename = "Name")]
    pub name: String,

    /// Role name.
    #[serde(rename = "Role")]
    pub role: String,

    /// Date of birth, `yyyy-MM-dd`.
    #[serde(
        rename = "DateOfBirth",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<String>,

    /// Nationality.
    #[serde(
        rename = "Nationality",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub nationality: Option<String>,

    /// Issuer.
    pub iss: String,

    /// Audience (same as issuer).
    pub aud: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration (Unix timestamp).
    pub exp: i64,

    /// Unique token identifier.
    pub jti: String,
}

impl TokenClaims {
    fn from_claim_set(claims: &ClaimSet, issuer: &str, iat: i64, exp: i64) -> AuthResult<Self> {
        let required = |claim_type: &str| {
            claims
                .find_first(claim_type)
                .map(str::to_string)
                .ok_or_else(|| AuthError::malformed_claim(claim_type, "missing"))
        };

        Ok(Self {
            name_identifier: required(claim_types::NAME_IDENTIFIER)?,
            name: required(claim_types::NAME)?,
            role: required(claim_types::ROLE)?,
            date_of_birth: claims.find_first(claim_types::DATE_OF_BIRTH).map(str::to_string),
            nationality: claims.find_first(claim_types::NATIONALITY).map(str::to_string),
            iss: issuer.to_string(),
            aud: issuer.to_string(),
            iat,
            exp,
            jti: uuid::Uuid::new_v4().to_string(),
        })
    }

    /// The identity claims, in issue order.
    #[must_use]
    pub fn to_claim_set(&self) -> ClaimSet {
        let mut claims = ClaimSet::new()
            .with(claim_types::NAME_IDENTIFIER, self.name_identifier.as_str())
            .with(claim_types::NAME, self.name.as_str())
            .with(claim_types::ROLE, self.role.as_str());
        if let Some(dob) = &self.date_of_birth {
            claims = claims.with(claim_types::DATE_OF_BIRTH, dob.as_str());
        }
        if let Some(nationality) = &self.nationality {
            claims = claims.with(claim_types::NATIONALITY, nationality.as_str());
        }
        claims
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::invalid_token(err.to_string()),
    }
}

// ============================================================================
// Token Service
// ============================================================================

/// Signs and verifies bearer tokens with a shared secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    lifetime: Duration,
}

impl TokenService {
    /// Creates a token service from validated configuration.
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        let secret = config.signing_key.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            lifetime: config.lifetime,
        }
    }

    /// Returns the issuer.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issues a token for `claims`, valid from now for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `MalformedClaim` if an identity claim is missing and `Internal`
    /// if signing fails.
    pub fn issue(&self, claims: &ClaimSet) -> AuthResult<String> {
        self.issue_at(claims, OffsetDateTime::now_utc())
    }

    /// Issues a token as if it were `now`.
    ///
    /// # Errors
    ///
    /// Same as [`issue`](Self::issue).
    pub fn issue_at(&self, claims: &ClaimSet, now: OffsetDateTime) -> AuthResult<String> {
        let lifetime = i64::try_from(self.lifetime.as_secs())
            .map_err(|_| AuthError::configuration("token lifetime is too large"))?;
        let iat = now.unix_timestamp();
        let payload = TokenClaims::from_claim_set(claims, &self.issuer, iat, iat + lifetime)?;

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| AuthError::internal(format!("failed to sign token: {e}")))
    }

    /// Decodes and validates a token.
    ///
    /// # Errors
    ///
    /// Returns `TokenExpired` for an expired token and `InvalidToken` for any
    /// other signature, issuer, audience or format problem.
    pub fn decode(&self, token: &str) -> AuthResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.validate_exp = true;

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(map_jwt_error)
    }

    /// Verifies a token and builds the authenticated principal it describes.
    ///
    /// # Errors
    ///
    /// Same as [`decode`](Self::decode), plus `MalformedClaim` if the identity
    /// claims do not form a valid principal.
    pub fn verify(&self, token: &str) -> AuthResult<Principal> {
        let claims = self.decode(token)?;
        Principal::authenticated(claims.to_claim_set())
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}
