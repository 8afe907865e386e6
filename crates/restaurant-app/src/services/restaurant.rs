//! Restaurant operations.
//!
//! Mutations load the restaurant first (missing is `NotFound`, checked before
//! authorization), then await the ownership check, then act.

use std::sync::Arc;

use restaurant_auth::{
    AuthError, AuthResult, AuthorizationEngine, CurrentPrincipal, ResourceId, ResourceOperation,
};

use crate::storage::{NewRestaurant, Restaurant, RestaurantStorage, RestaurantUpdate};

pub struct RestaurantService {
    store: Arc<dyn RestaurantStorage>,
    engine: Arc<AuthorizationEngine>,
}

impl RestaurantService {
    pub fn new(store: Arc<dyn RestaurantStorage>, engine: Arc<AuthorizationEngine>) -> Self {
        Self { store, engine }
    }

    /// Creates a restaurant owned by the caller.
    pub async fn create(
        &self,
        caller: &dyn CurrentPrincipal,
        restaurant: NewRestaurant,
    ) -> AuthResult<ResourceId> {
        self.engine
            .authorize_operation(caller.principal(), ResourceOperation::Create, None)
            .await?;
        let owner = caller.user_id().ok_or(AuthError::Unauthenticated)?;

        let id = self.store.insert(restaurant, owner).await?;
        tracing::info!(resource_id = id, principal_id = owner, "Restaurant created");
        Ok(id)
    }

    pub async fn get(&self, caller: &dyn CurrentPrincipal, id: ResourceId) -> AuthResult<Restaurant> {
        let restaurant = self.load(id).await?;
        self.engine
            .authorize_operation(
                caller.principal(),
                ResourceOperation::Read,
                Some(&restaurant.as_resource()),
            )
            .await?;
        Ok(restaurant)
    }

    /// Updates a restaurant. Only its creator may do so.
    pub async fn update(
        &self,
        caller: &dyn CurrentPrincipal,
        id: ResourceId,
        update: RestaurantUpdate,
    ) -> AuthResult<()> {
        let restaurant = self.load(id).await?;
        self.engine
            .authorize_operation(
                caller.principal(),
                ResourceOperation::Update,
                Some(&restaurant.as_resource()),
            )
            .await?;

        if !self.store.update(id, update).await? {
            return Err(restaurant_not_found());
        }
        tracing::info!(resource_id = id, principal_id = ?caller.user_id(), "Restaurant updated");
        Ok(())
    }

    /// Deletes a restaurant. Only its creator may do so.
    pub async fn delete(&self, caller: &dyn CurrentPrincipal, id: ResourceId) -> AuthResult<()> {
        tracing::info!(resource_id = id, "Restaurant DELETE action invoked");
        let restaurant = self.load(id).await?;
        self.engine
            .authorize_operation(
                caller.principal(),
                ResourceOperation::Delete,
                Some(&restaurant.as_resource()),
            )
            .await?;

        if !self.store.delete(id).await? {
            return Err(restaurant_not_found());
        }
        Ok(())
    }

    async fn load(&self, id: ResourceId) -> AuthResult<Restaurant> {
        self.store
            .get(id)
            .await?
            .ok_or_else(restaurant_not_found)
    }
}

fn restaurant_not_found() -> AuthError {
    AuthError::not_found("Restaurant not found")
}
