//! Storage traits consumed by the auth module.
//!
//! - [`UserStorage`] - identity lookups for the login flow
//! - [`ResourceOwnership`] - ownership queries for authorization handlers
//!
//! Backends implement these traits; the auth module never talks to a
//! database directly.

pub mod ownership;
pub mod user;

pub use ownership::ResourceOwnership;
pub use user::{DEFAULT_ROLE_ID, Role, User, UserBuilder, UserStorage};
