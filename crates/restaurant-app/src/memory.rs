//! In-memory backing store.
//!
//! One [`MemoryStore`] serves users, restaurants and ownership queries, the
//! way a single database context would. Maps are `DashMap`s; ids come from
//! atomic counters starting at 1.
//!
//! Ownership counts read the live map with no isolation, so a restaurant
//! inserted concurrently may or may not be counted.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use restaurant_auth::storage::{ResourceOwnership, Role, User, UserStorage};
use restaurant_auth::{AuthError, AuthResult, ResourceId, UserId};

use crate::storage::{NewRestaurant, Restaurant, RestaurantStorage, RestaurantUpdate};

/// Roles present in a fresh store.
pub const DEFAULT_ROLES: [(i64, &str); 3] = [(1, "User"), (2, "Manager"), (3, "Admin")];

#[derive(Debug)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    roles: DashMap<i64, Role>,
    restaurants: DashMap<ResourceId, Restaurant>,
    next_user_id: AtomicI64,
    next_restaurant_id: AtomicI64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates a store holding only [`DEFAULT_ROLES`].
    #[must_use]
    pub fn new() -> Self {
        let roles = DEFAULT_ROLES
            .iter()
            .map(|(id, name)| (*id, Role::new(*id, *name)))
            .collect();
        Self {
            users: DashMap::new(),
            roles,
            restaurants: DashMap::new(),
            next_user_id: AtomicI64::new(1),
            next_restaurant_id: AtomicI64::new(1),
        }
    }

    /// Number of stored restaurants.
    #[must_use]
    pub fn restaurant_count(&self) -> usize {
        self.restaurants.len()
    }
}

#[async_trait]
impl UserStorage for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        Ok(self.users.get(email).map(|u| u.value().clone()))
    }

    async fn find_role(&self, role_id: i64) -> AuthResult<Option<Role>> {
        Ok(self.roles.get(&role_id).map(|r| r.value().clone()))
    }

    async fn create(&self, user: &User) -> AuthResult<UserId> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AuthError::invalid_request("email is already taken")),
            Entry::Vacant(slot) => {
                let id = self.next_user_id.fetch_add(1, Ordering::SeqCst);
                let mut stored = user.clone();
                stored.id = id;
                slot.insert(stored);
                Ok(id)
            }
        }
    }
}

#[async_trait]
impl ResourceOwnership for MemoryStore {
    async fn count_created_by(&self, user_id: UserId) -> AuthResult<u64> {
        let count = self
            .restaurants
            .iter()
            .filter(|r| r.created_by_id == Some(user_id))
            .count();
        Ok(count as u64)
    }

    async fn owner_of(&self, resource_id: ResourceId) -> AuthResult<Option<UserId>> {
        Ok(self
            .restaurants
            .get(&resource_id)
            .and_then(|r| r.created_by_id))
    }
}

#[async_trait]
impl RestaurantStorage for MemoryStore {
    async fn insert(
        &self,
        restaurant: NewRestaurant,
        created_by_id: UserId,
    ) -> AuthResult<ResourceId> {
        let id = self.next_restaurant_id.fetch_add(1, Ordering::SeqCst);
        self.restaurants.insert(
            id,
            Restaurant {
                id,
                name: restaurant.name,
                description: restaurant.description,
                category: restaurant.category,
                has_delivery: restaurant.has_delivery,
                created_by_id: Some(created_by_id),
            },
        );
        Ok(id)
    }

    async fn get(&self, id: ResourceId) -> AuthResult<Option<Restaurant>> {
        Ok(self.restaurants.get(&id).map(|r| r.value().clone()))
    }

    async fn update(&self, id: ResourceId, update: RestaurantUpdate) -> AuthResult<bool> {
        let Some(mut restaurant) = self.restaurants.get_mut(&id) else {
            return Ok(false);
        };
        restaurant.name = update.name;
        restaurant.description = update.description;
        restaurant.has_delivery = update.has_delivery;
        Ok(true)
    }

    async fn delete(&self, id: ResourceId) -> AuthResult<bool> {
        Ok(self.restaurants.remove(&id).is_some())
    }
}
