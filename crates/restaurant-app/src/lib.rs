//! # restaurant-app
//!
//! Wires [`restaurant_auth`] into the restaurant domain.
//!
//! ## Modules
//!
//! - [`config`] - Layered application configuration
//! - [`observability`] - Tracing initialization
//! - [`bootstrap`] - Builds the engine and services from configuration
//! - [`storage`] - Restaurant records and their storage trait
//! - [`memory`] - In-memory backing store
//! - [`services`] - Guarded restaurant operations
//! - [`scope`] - Per-request principal resolution

pub mod bootstrap;
pub mod config;
pub mod memory;
pub mod observability;
pub mod scope;
pub mod services;
pub mod storage;

pub use bootstrap::App;
pub use config::AppConfig;
pub use memory::MemoryStore;
pub use scope::RequestScope;
pub use services::RestaurantService;
pub use storage::{NewRestaurant, Restaurant, RestaurantStorage, RestaurantUpdate};
