//! # restaurant-auth
//!
//! Authentication and policy-based authorization for the Restaurant API.
//!
//! This crate provides:
//! - A claims-based principal model
//! - Requirement variants, handlers and an authorization engine with
//!   AND-across-requirements / OR-across-handlers semantics
//! - Named policies fixed at startup
//! - Credential issuing (claim assembly, HS256 tokens) and Argon2 password
//!   verification for the login flow
//!
//! ## Modules
//!
//! - [`claims`] - Claims, claim sets and the principal
//! - [`policy`] - Requirements, handlers, policy registry and engine
//! - [`token`] - Claim assembly and token issuing/verification
//! - [`login`] - Login and registration
//! - [`password`] - Password hashing and credential verification
//! - [`storage`] - Storage traits for users and resource ownership
//! - [`config`] - Token and audit configuration

pub mod claims;
pub mod config;
pub mod error;
pub mod login;
pub mod password;
pub mod policy;
pub mod storage;
pub mod token;
pub mod types;

pub use claims::{Claim, ClaimSet, CurrentPrincipal, Principal, claim_types};
pub use config::{AuditConfig, AuthConfig, ConfigError, TokenConfig};
pub use error::{AuthError, ErrorCategory};
pub use login::{LoginService, RegisterUser};
pub use password::{Argon2Verifier, CredentialVerifier};
pub use policy::{
    AuthorizationEngine, AuthorizationHandler, AuthorizationResult, EvaluationContext,
    FailureReason, HandlerRegistry, Policy, PolicyRegistry, Requirement, RequirementKind,
    ResourceOperation,
};
pub use storage::{ResourceOwnership, Role, User, UserStorage};
pub use token::{TokenService, assemble_claims};
pub use types::{Resource, ResourceId, UserId};

/// Type alias for authentication/authorization results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use restaurant_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::claims::{CurrentPrincipal, Principal};
    pub use crate::error::AuthError;
    pub use crate::policy::{AuthorizationEngine, Requirement, ResourceOperation};
    pub use crate::types::{Resource, ResourceId, UserId};
}
