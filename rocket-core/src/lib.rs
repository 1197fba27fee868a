pub mod catalog;
pub mod context;
pub mod identity;
pub mod order;
pub mod payment;
pub mod repository;

use std::fmt;

pub use catalog::{
    Category, Dimensions, Manufacturer, MetadataValue, Part, PartCatalog, PartFilter,
};
pub use context::{CancelHandle, RequestContext};
pub use identity::{OrderIdSource, RandomOrderIds};
pub use order::{Order, OrderFilter, OrderStatus, PaymentInfo, PaymentMethod};
pub use payment::PaymentGateway;
pub use repository::{OrderRepository, StoreError};

/// Failure classes shared by every layer of the order workflow.
///
/// Errors are inspected by kind, never by message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or empty request.
    InvalidInput,
    /// The referenced order does not exist.
    NotFound,
    /// Duplicate identifier at creation.
    AlreadyExists,
    /// The order's status does not allow the requested transition.
    Conflict,
    /// A catalog or payment call failed.
    Dependency,
    /// The caller's deadline or cancellation signal fired first.
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::NotFound => "not found",
            ErrorKind::AlreadyExists => "already exists",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Dependency => "dependency failure",
            ErrorKind::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}
