use async_trait::async_trait;
use rocket_core::repository::{OrderRepository, StoreError};
use rocket_core::{Order, OrderFilter, OrderStatus};
use rocket_shared::filter::{candidates, select};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local order storage.
///
/// One reader/writer lock guards the whole key space: reads share it, every
/// write holds it exclusively for its full check-then-write sequence. The map
/// owns its records; callers only ever see clones.
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(order: &Order) -> Result<(), StoreError> {
    order.validate().map_err(StoreError::InvalidState)
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create_order(&self, order: &Order) -> Result<(), StoreError> {
        validate(order)?;

        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.order_id) {
            return Err(StoreError::AlreadyExists(order.order_id));
        }
        orders.insert(order.order_id, order.clone());
        tracing::debug!(order_id = %order.order_id, "order stored");
        Ok(())
    }

    async fn get_order(&self, id: Uuid) -> Result<Order, StoreError> {
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update_order(&self, order: &Order) -> Result<(), StoreError> {
        validate(order)?;

        let mut orders = self.orders.write().await;
        let slot = orders
            .get_mut(&order.order_id)
            .ok_or(StoreError::NotFound(order.order_id))?;
        *slot = order.clone();
        Ok(())
    }

    async fn update_order_if(
        &self,
        order: &Order,
        expected: OrderStatus,
    ) -> Result<(), StoreError> {
        validate(order)?;

        let mut orders = self.orders.write().await;
        let slot = orders
            .get_mut(&order.order_id)
            .ok_or(StoreError::NotFound(order.order_id))?;
        if slot.status != expected {
            return Err(StoreError::StatusMismatch {
                order_id: order.order_id,
                expected,
                actual: slot.status,
            });
        }
        *slot = order.clone();
        tracing::debug!(
            order_id = %order.order_id,
            from = %expected,
            to = %order.status,
            "order status swapped"
        );
        Ok(())
    }

    async fn delete_order(&self, id: Uuid) -> Result<(), StoreError> {
        match self.orders.write().await.remove(&id) {
            Some(_) => {
                tracing::debug!(order_id = %id, "order deleted");
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn list_orders_by_owner(&self, user_id: &str) -> Result<Vec<Order>, StoreError> {
        let mut owned: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|order| order.created_at);
        Ok(owned)
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().await;
        Ok(select(candidates(&orders, &filter.order_ids), filter))
    }
}
