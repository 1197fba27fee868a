use async_trait::async_trait;
use uuid::Uuid;
use crate::order::{Order, OrderFilter, OrderStatus};
use crate::ErrorKind;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("Order already exists: {0}")]
    AlreadyExists(Uuid),

    #[error("Invalid order state: {0}")]
    InvalidState(String),

    #[error("Order {order_id} is {actual}, expected {expected}")]
    StatusMismatch {
        order_id: Uuid,
        expected: OrderStatus,
        actual: OrderStatus,
    },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            StoreError::InvalidState(_) => ErrorKind::InvalidInput,
            StoreError::StatusMismatch { .. } => ErrorKind::Conflict,
        }
    }
}

/// Authoritative order storage.
///
/// Implementations must be thread-safe and must never hand out shared
/// mutable state: every order passed in is copied before it is stored and
/// every order returned is an independent copy. Writes validate the record
/// with [`Order::validate`] and fail with [`StoreError::InvalidState`].
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a new order; `AlreadyExists` if the id is taken.
    async fn create_order(&self, order: &Order) -> Result<(), StoreError>;

    async fn get_order(&self, id: Uuid) -> Result<Order, StoreError>;

    /// Replace an existing order; `NotFound` if absent.
    async fn update_order(&self, order: &Order) -> Result<(), StoreError>;

    /// Replace an existing order only while its stored status is `expected`.
    ///
    /// The comparison and the write are one atomic step.
    async fn update_order_if(
        &self,
        order: &Order,
        expected: OrderStatus,
    ) -> Result<(), StoreError>;

    /// Administrative removal; `NotFound` if absent.
    async fn delete_order(&self, id: Uuid) -> Result<(), StoreError>;

    /// Every order owned by `user_id`, possibly none.
    async fn list_orders_by_owner(&self, user_id: &str) -> Result<Vec<Order>, StoreError>;

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError>;
}
