//! User storage trait.
//!
//! Defines the identity record used by the login flow and the interface for
//! looking it up. Implementations are provided by storage backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::AuthResult;
use crate::types::UserId;

/// Role id assigned to newly registered users.
pub const DEFAULT_ROLE_ID: i64 = 1;

time::serde::format_description!(pub(crate) calendar_date, Date, "[year]-[month]-[day]");

// =============================================================================
// User Type
// =============================================================================

/// A role a user can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier.
    pub id: i64,

    /// Role name, embedded in the `Role` claim.
    pub name: String,
}

impl Role {
    /// Creates a new role.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A user in the identity store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    #[serde(default)]
    pub id: UserId,

    /// Login email.
    pub email: String,

    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// Date of birth.
    #[serde(
        default,
        with = "calendar_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<Date>,

    /// Nationality; empty strings are treated as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,

    /// Argon2 PHC hash of the password.
    ///
    /// Filter this field out manually when exposing a user.
    #[serde(default)]
    pub password_hash: Option<String>,

    /// Assigned role.
    pub role: Role,
}

impl User {
    /// Creates a new user builder.
    #[must_use]
    pub fn builder(email: impl Into<String>) -> UserBuilder {
        UserBuilder::new(email)
    }

    /// "First Last".
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// User Builder
// =============================================================================

/// Builder for creating `User` instances.
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    fn new(email: impl Into<String>) -> Self {
        Self {
            user: User {
                id: 0,
                email: email.into(),
                first_name: String::new(),
                last_name: String::new(),
                date_of_birth: None,
                nationality: None,
                password_hash: None,
                role: Role::new(DEFAULT_ROLE_ID, "User"),
            },
        }
    }

    /// Sets the user ID.
    #[must_use]
    pub fn id(mut self, id: UserId) -> Self {
        self.user.id = id;
        self
    }

    /// Sets first and last name.
    #[must_use]
    pub fn name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.user.first_name = first.into();
        self.user.last_name = last.into();
        self
    }

    /// Sets the date of birth.
    #[must_use]
    pub fn date_of_birth(mut self, date: Date) -> Self {
        self.user.date_of_birth = Some(date);
        self
    }

    /// Sets the nationality.
    #[must_use]
    pub fn nationality(mut self, nationality: impl Into<String>) -> Self {
        self.user.nationality = Some(nationality.into());
        self
    }

    /// Sets the password hash.
    #[must_use]
    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.user.password_hash = Some(hash.into());
        self
    }

    /// Sets the role.
    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.user.role = role;
        self
    }

    /// Builds the user.
    #[must_use]
    pub fn build(self) -> User {
        self.user
    }
}

// =============================================================================
// User Storage Trait
// =============================================================================

/// Storage operations for users.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Find a user by email, with its role loaded.
    ///
    /// Returns `None` if no user has this email.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Resolve a role by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_role(&self, role_id: i64) -> AuthResult<Option<Role>>;

    /// Create a new user and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A user with the same email already exists
    /// - The storage operation fails
    async fn create(&self, user: &User) -> AuthResult<UserId>;
}
