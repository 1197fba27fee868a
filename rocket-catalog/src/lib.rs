pub mod client;
pub mod inventory;
pub mod pricing;

pub use client::InventoryCatalog;
pub use inventory::{InventoryError, InventoryRepository};
pub use pricing::{price_order, round_price, PricingError};
