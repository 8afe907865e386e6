//! Login and registration.
//!
//! Every login failure (unknown email, no stored hash, wrong password,
//! unparsable hash) returns the same [`AuthError::InvalidCredentials`] after
//! the same amount of password hashing work.

use std::sync::Arc;

use serde::Deserialize;
use time::Date;

use crate::AuthResult;
use crate::config::AuditConfig;
use crate::error::AuthError;
use crate::password::{CredentialVerifier, hash_password};
use crate::storage::{DEFAULT_ROLE_ID, User, UserStorage};
use crate::token::{TokenService, assemble_claims};
use crate::types::UserId;

/// Registration request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    /// Login email.
    pub email: String,

    /// Plaintext password, hashed before storage.
    pub password: String,

    /// First name.
    #[serde(default)]
    pub first_name: String,

    /// Last name.
    #[serde(default)]
    pub last_name: String,

    /// Nationality.
    #[serde(default)]
    pub nationality: Option<String>,

    /// Date of birth.
    #[serde(default, with = "crate::storage::user::calendar_date::option")]
    pub date_of_birth: Option<Date>,

    /// Role id; defaults to the regular user role.
    #[serde(default = "default_role_id")]
    pub role_id: i64,
}

fn default_role_id() -> i64 {
    DEFAULT_ROLE_ID
}

impl RegisterUser {
    /// Creates a request with the default role and no optional fields.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: String::new(),
            last_name: String::new(),
            nationality: None,
            date_of_birth: None,
            role_id: DEFAULT_ROLE_ID,
        }
    }
}

/// Issues tokens for valid credentials and registers new users.
pub struct LoginService {
    users: Arc<dyn UserStorage>,
    verifier: Arc<dyn CredentialVerifier>,
    tokens: Arc<TokenService>,
    audit: AuditConfig,
}

impl LoginService {
    /// Creates a login service.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStorage>,
        verifier: Arc<dyn CredentialVerifier>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            verifier,
            tokens,
            audit: AuditConfig::default(),
        }
    }

    /// Sets the audit configuration.
    #[must_use]
    pub fn with_audit(mut self, audit: AuditConfig) -> Self {
        self.audit = audit;
        self
    }

    /// Authenticates `email`/`password` and issues a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` if the credentials do not match a user,
    /// `Storage` if the user store fails.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<String> {
        let Some(user) = self.users.find_by_email(email).await? else {
            self.verifier.verify_placeholder(password);
            return Err(self.reject(email, "unknown email"));
        };

        let Some(stored_hash) = user.password_hash.as_deref() else {
            self.verifier.verify_placeholder(password);
            return Err(self.reject(email, "no password set"));
        };

        if !self.verifier.verify(stored_hash, password) {
            return Err(self.reject(email, "password mismatch"));
        }

        let token = self.tokens.issue(&assemble_claims(&user)?)?;

        if self.audit.log_successful_auth {
            tracing::info!(principal_id = user.id, role = %user.role.name, "Login succeeded");
        }

        Ok(token)
    }

    /// Registers a new user with a hashed password.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the email is taken or the role does not
    /// exist, `Storage` if the store fails.
    pub async fn register(&self, request: RegisterUser) -> AuthResult<UserId> {
        if request.email.trim().is_empty() {
            return Err(AuthError::invalid_request("email is required"));
        }
        if request.password.is_empty() {
            return Err(AuthError::invalid_request("password is required"));
        }

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AuthError::invalid_request("email is already taken"));
        }

        let role = self
            .users
            .find_role(request.role_id)
            .await?
            .ok_or_else(|| {
                AuthError::invalid_request(format!("role {} does not exist", request.role_id))
            })?;

        let password_hash = hash_password(&request.password)
            .map_err(|e| AuthError::internal(format!("failed to hash password: {e}")))?;

        let mut builder = User::builder(request.email)
            .name(request.first_name, request.last_name)
            .password_hash(password_hash)
            .role(role);
        if let Some(date_of_birth) = request.date_of_birth {
            builder = builder.date_of_birth(date_of_birth);
        }
        if let Some(nationality) = request.nationality.filter(|n| !n.is_empty()) {
            builder = builder.nationality(nationality);
        }

        let id = self.users.create(&builder.build()).await?;
        tracing::info!(principal_id = id, "User registered");
        Ok(id)
    }

    fn reject(&self, email: &str, cause: &str) -> AuthError {
        if self.audit.log_failed_auth {
            tracing::info!(email = %email, cause, "Login failed");
        }
        AuthError::InvalidCredentials
    }
}

impl std::fmt::Debug for LoginService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginService")
            .field("tokens", &self.tokens)
            .field("audit", &self.audit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::RwLock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use time::macros::date;

    use super::*;
    use crate::claims::claim_types;
    use crate::config::TokenConfig;
    use crate::error::INVALID_CREDENTIALS_MESSAGE;
    use crate::password::Argon2Verifier;
    use crate::storage::Role;

    #[derive(Default)]
    struct MockUserStorage {
        users: RwLock<HashMap<String, User>>,
    }

    #[async_trait]
    impl UserStorage for MockUserStorage {
        async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
            Ok(self.users.read().unwrap().get(email).cloned())
        }

        async fn find_role(&self, role_id: i64) -> AuthResult<Option<Role>> {
            Ok(match role_id {
                1 => Some(Role::new(1, "User")),
                2 => Some(Role::new(2, "Manager")),
                _ => None,
            })
        }

        async fn create(&self, user: &User) -> AuthResult<UserId> {
            let mut users = self.users.write().unwrap();
            let id = users.len() as UserId + 1;
            let mut stored = user.clone();
            stored.id = id;
            users.insert(stored.email.clone(), stored);
            Ok(id)
        }
    }

    fn service() -> (LoginService, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new(&TokenConfig {
            issuer: "http://restaurant-api.local".to_string(),
            signing_key: "PRIVATE_KEY_DONT_SHARE_0123456789abcdef".to_string(),
            lifetime: Duration::from_secs(3600),
        }));
        let service = LoginService::new(
            Arc::new(MockUserStorage::default()),
            Arc::new(Argon2Verifier),
            tokens.clone(),
        );
        (service, tokens)
    }

    fn jan() -> RegisterUser {
        RegisterUser {
            first_name: "Jan".to_string(),
            last_name: "Kowalski".to_string(),
            nationality: Some("Polish".to_string()),
            date_of_birth: Some(date!(1990 - 05 - 07)),
            ..RegisterUser::new("jan@example.com", "password1")
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (service, tokens) = service();
        let id = service.register(jan()).await.unwrap();

        let token = service.login("jan@example.com", "password1").await.unwrap();
        let principal = tokens.verify(&token).unwrap();

        assert_eq!(principal.id(), Some(id));
        assert_eq!(principal.display_name(), Some("Jan Kowalski"));
        assert_eq!(principal.role(), Some("User"));
        assert_eq!(principal.nationality(), Some("Polish"));
        assert_eq!(
            principal.claims().find_first(claim_types::DATE_OF_BIRTH),
            Some("1990-05-07")
        );
    }

    #[tokio::test]
    async fn test_failures_are_indistinguishable() {
        let (service, _) = service();
        service.register(jan()).await.unwrap();

        let wrong_password = service
            .login("jan@example.com", "password2")
            .await
            .unwrap_err();
        let unknown_email = service
            .login("nobody@example.com", "password1")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.to_string(), INVALID_CREDENTIALS_MESSAGE);
    }

    /// Counts verifications and delegates to Argon2.
    #[derive(Default)]
    struct CountingVerifier {
        calls: AtomicUsize,
    }

    impl CredentialVerifier for CountingVerifier {
        fn verify(&self, stored_hash: &str, secret: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Argon2Verifier.verify(stored_hash, secret)
        }
    }

    #[tokio::test]
    async fn test_every_failure_runs_one_verification() {
        let users = Arc::new(MockUserStorage::default());
        let verifier = Arc::new(CountingVerifier::default());
        let tokens = Arc::new(TokenService::new(&TokenConfig {
            issuer: "http://restaurant-api.local".to_string(),
            signing_key: "PRIVATE_KEY_DONT_SHARE_0123456789abcdef".to_string(),
            lifetime: Duration::from_secs(3600),
        }));
        let service = LoginService::new(users.clone(), verifier.clone(), tokens);
        service.register(jan()).await.unwrap();
        users
            .create(&User::builder("nohash@example.com").role(Role::new(1, "User")).build())
            .await
            .unwrap();

        for email in ["nobody@example.com", "nohash@example.com", "jan@example.com"] {
            let before = verifier.calls.load(Ordering::SeqCst);
            let err = service.login(email, "password2").await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
            assert_eq!(verifier.calls.load(Ordering::SeqCst) - before, 1, "{email}");
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (service, _) = service();
        service.register(jan()).await.unwrap();
        let err = service.register(jan()).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_unknown_role_rejected() {
        let (service, _) = service();
        let request = RegisterUser {
            role_id: 42,
            ..jan()
        };
        let err = service.register(request).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_register_defaults_role_and_omits_empty_nationality() {
        let (service, tokens) = service();
        let request = RegisterUser {
            first_name: "Anna".to_string(),
            last_name: "Nowak".to_string(),
            nationality: Some(String::new()),
            ..RegisterUser::new("anna@example.com", "password1")
        };
        service.register(request).await.unwrap();

        let token = service.login("anna@example.com", "password1").await.unwrap();
        let principal = tokens.verify(&token).unwrap();
        assert_eq!(principal.role(), Some("User"));
        assert!(principal.nationality().is_none());
        assert!(principal.date_of_birth().is_none());
    }

    #[test]
    fn test_register_request_deserialization() {
        let request: RegisterUser = serde_json::from_str(
            r#"{ "email": "a@b.c", "password": "pw", "dateOfBirth": "2001-02-03" }"#,
        )
        .unwrap();
        assert_eq!(request.role_id, DEFAULT_ROLE_ID);
        assert_eq!(request.date_of_birth, Some(date!(2001 - 02 - 03)));
    }
}
