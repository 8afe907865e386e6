//! Password hashing and verification.
//!
//! Argon2id with default parameters and an `OsRng` salt. Hashes are stored in
//! PHC string format.
//!
//! # Example
//!
//! ```
//! use restaurant_auth::password::{hash_password, verify_password};
//!
//! let hash = hash_password("s3cret!").unwrap();
//! assert!(verify_password("s3cret!", &hash).unwrap());
//! assert!(!verify_password("wrong", &hash).unwrap());
//! ```

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hash a password for storage using Argon2id.
///
/// # Errors
///
/// Returns `argon2::password_hash::Error` if hashing fails (rare).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only if the hash is not valid PHC.
///
/// # Errors
///
/// Returns `argon2::password_hash::Error` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    let result = Argon2::default().verify_password(password.as_bytes(), &parsed_hash);
    Ok(result.is_ok())
}

/// Hash that no stored account uses, verified against when there is no real
/// hash to check so the work done does not depend on the account existing.
fn placeholder_hash() -> &'static str {
    static PLACEHOLDER: OnceLock<String> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| hash_password("restaurant-auth/placeholder").unwrap_or_default())
}

/// Checks a submitted secret against a stored hash.
pub trait CredentialVerifier: Send + Sync {
    /// Returns `true` if `secret` matches `stored_hash`. Unparsable hashes
    /// never match.
    fn verify(&self, stored_hash: &str, secret: &str) -> bool;

    /// Runs a verification whose result is discarded, for logins that have
    /// no stored hash to check.
    fn verify_placeholder(&self, secret: &str) {
        let _ = self.verify(placeholder_hash(), secret);
    }
}

/// [`CredentialVerifier`] backed by Argon2.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Verifier;

impl CredentialVerifier for Argon2Verifier {
    fn verify(&self, stored_hash: &str, secret: &str) -> bool {
        match verify_password(secret, stored_hash) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is not a valid PHC string");
                false
            }
        }
    }
}
