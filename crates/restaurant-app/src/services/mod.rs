//! Application services guarded by the authorization engine.

pub mod restaurant;

pub use restaurant::RestaurantService;
