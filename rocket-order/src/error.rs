use rocket_core::{ErrorKind, OrderStatus, StoreError};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown parts: {}", .0.join(", "))]
    UnknownParts(Vec<String>),

    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("Order already exists: {0}")]
    AlreadyExists(Uuid),

    #[error("Order {order_id} is {status}: {reason}")]
    Conflict {
        order_id: Uuid,
        status: OrderStatus,
        reason: &'static str,
    },

    #[error("Another payment or cancellation is in progress for order {0}")]
    OperationInProgress(Uuid),

    #[error("{service} call failed: {message}")]
    Dependency {
        service: &'static str,
        message: String,
    },

    /// The processor confirmed the charge but the order could not be marked
    /// paid. Needs manual reconciliation.
    #[error("Payment {transaction_id} for order {order_id} was not recorded: {reason}")]
    PaymentNotRecorded {
        order_id: Uuid,
        transaction_id: String,
        reason: String,
    },

    #[error("Order store failure: {0}")]
    Store(StoreError),

    #[error("Request cancelled before completion")]
    Cancelled,
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::InvalidInput(_) | OrderError::UnknownParts(_) => ErrorKind::InvalidInput,
            OrderError::NotFound(_) => ErrorKind::NotFound,
            OrderError::AlreadyExists(_)
            | OrderError::Conflict { .. }
            | OrderError::OperationInProgress(_) => ErrorKind::Conflict,
            OrderError::Dependency { .. }
            | OrderError::PaymentNotRecorded { .. }
            | OrderError::Store(_) => ErrorKind::Dependency,
            OrderError::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub(crate) fn dependency(service: &'static str, message: impl Into<String>) -> Self {
        OrderError::Dependency {
            service,
            message: message.into(),
        }
    }
}
