//! Authentication and authorization error types.
//!
//! The taxonomy separates "cannot evaluate" (configuration, storage, contract
//! violations) from "evaluated and denied" (`Forbidden`, `Unauthenticated`), so
//! call sites can react to each differently.

use std::fmt;

/// Message shared by every failed login, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Errors that can occur during authentication and authorization operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Login failed. Unknown identity and wrong secret are indistinguishable.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The operation requires a verified principal and none was presented.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Policy evaluation completed and denied access.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Description of why access is forbidden.
        message: String,
    },

    /// A required claim is missing or cannot be parsed.
    #[error("Malformed claim '{claim}': {message}")]
    MalformedClaim {
        /// The claim type that was malformed.
        claim: String,
        /// Description of the problem.
        message: String,
    },

    /// The authorization setup is invalid (unknown policy, missing handler).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// The caller broke the evaluation contract or sent an invalid request.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of why the request is invalid.
        message: String,
    },

    /// The requested entity does not exist.
    #[error("Not found: {message}")]
    NotFound {
        /// Description of what was not found.
        message: String,
    },

    /// The bearer token is invalid, malformed, or cannot be parsed.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// The bearer token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// An error occurred while reading or writing the backing store.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Forbidden` error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a new `MalformedClaim` error.
    #[must_use]
    pub fn malformed_claim(claim: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedClaim {
            claim: claim.into(),
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::Unauthenticated
                | Self::Forbidden { .. }
                | Self::InvalidRequest { .. }
                | Self::NotFound { .. }
                | Self::InvalidToken { .. }
                | Self::TokenExpired
        )
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::Storage { .. } | Self::Internal { .. }
        )
    }

    /// Returns `true` if this is an authentication error.
    #[must_use]
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::Unauthenticated
                | Self::InvalidToken { .. }
                | Self::TokenExpired
        )
    }

    /// Returns `true` if this is an access-denial that must be surfaced as such.
    #[must_use]
    pub fn is_authorization_error(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidCredentials => ErrorCategory::Authentication,
            Self::Unauthenticated => ErrorCategory::Authentication,
            Self::Forbidden { .. } => ErrorCategory::Authorization,
            Self::MalformedClaim { .. } => ErrorCategory::Validation,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::InvalidRequest { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::Validation,
            Self::InvalidToken { .. } => ErrorCategory::Token,
            Self::TokenExpired => ErrorCategory::Token,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of authentication/authorization errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Identity verification failures.
    Authentication,
    /// Permission check failures.
    Authorization,
    /// Token validation failures.
    Token,
    /// Request or claim validation errors.
    Validation,
    /// Storage errors.
    Infrastructure,
    /// Configuration errors.
    Configuration,
    /// Internal errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Authorization => write!(f, "authorization"),
            Self::Token => write!(f, "token"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            INVALID_CREDENTIALS_MESSAGE
        );
    }

    #[test]
    fn test_error_display() {
        let err = AuthError::forbidden("not the owner");
        assert_eq!(err.to_string(), "Forbidden: not the owner");

        let err = AuthError::malformed_claim("DateOfBirth", "not a date");
        assert_eq!(
            err.to_string(),
            "Malformed claim 'DateOfBirth': not a date"
        );

        let err = AuthError::configuration("unknown policy 'Nope'");
        assert_eq!(err.to_string(), "Configuration error: unknown policy 'Nope'");
    }

    #[test]
    fn test_error_predicates() {
        let err = AuthError::forbidden("no access");
        assert!(err.is_client_error());
        assert!(err.is_authorization_error());
        assert!(!err.is_authentication_error());

        let err = AuthError::Unauthenticated;
        assert!(err.is_client_error());
        assert!(err.is_authentication_error());
        assert!(!err.is_authorization_error());

        let err = AuthError::configuration("missing handler");
        assert!(!err.is_client_error());
        assert!(err.is_server_error());

        let err = AuthError::storage("database down");
        assert!(err.is_server_error());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::InvalidCredentials.category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            AuthError::forbidden("x").category(),
            ErrorCategory::Authorization
        );
        assert_eq!(
            AuthError::configuration("x").category(),
            ErrorCategory::Configuration
        );
        assert_eq!(AuthError::TokenExpired.category(), ErrorCategory::Token);
        assert_eq!(ErrorCategory::Infrastructure.to_string(), "infrastructure");
    }
}
