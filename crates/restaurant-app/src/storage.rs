//! Restaurant records and their storage trait.

use async_trait::async_trait;
use restaurant_auth::{AuthResult, Resource, ResourceId, UserId};
use serde::{Deserialize, Serialize};

/// A stored restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub has_delivery: bool,
    /// Creator; the only principal allowed to update or delete it.
    pub created_by_id: Option<UserId>,
}

impl Restaurant {
    /// Ownership view used by authorization.
    #[must_use]
    pub fn as_resource(&self) -> Resource {
        Resource {
            id: self.id,
            created_by_id: self.created_by_id,
        }
    }
}

/// Fields supplied when creating a restaurant.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRestaurant {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub has_delivery: bool,
}

/// Fields an owner may change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantUpdate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub has_delivery: bool,
}

/// Storage operations for restaurants.
#[async_trait]
pub trait RestaurantStorage: Send + Sync {
    /// Stores a new restaurant created by `created_by_id` and returns its id.
    async fn insert(&self, restaurant: NewRestaurant, created_by_id: UserId)
    -> AuthResult<ResourceId>;

    /// Loads a restaurant by id.
    async fn get(&self, id: ResourceId) -> AuthResult<Option<Restaurant>>;

    /// Replaces the mutable fields. Returns `false` if the restaurant is gone.
    async fn update(&self, id: ResourceId, update: RestaurantUpdate) -> AuthResult<bool>;

    /// Removes a restaurant. Returns `false` if it did not exist.
    async fn delete(&self, id: ResourceId) -> AuthResult<bool>;
}
