use async_trait::async_trait;
use rocket_core::{Part, PartCatalog, PartFilter};
use std::sync::Arc;
use crate::inventory::InventoryRepository;

/// `PartCatalog` served from an in-process inventory.
///
/// Stands in for the remote catalog service when both run in one process.
#[derive(Clone)]
pub struct InventoryCatalog {
    inventory: Arc<InventoryRepository>,
}

impl InventoryCatalog {
    pub fn new(inventory: Arc<InventoryRepository>) -> Self {
        Self { inventory }
    }
}

#[async_trait]
impl PartCatalog for InventoryCatalog {
    async fn lookup_parts(
        &self,
        filter: &PartFilter,
    ) -> Result<Vec<Part>, Box<dyn std::error::Error + Send + Sync>> {
        let parts = self.inventory.list_parts(filter).await;
        tracing::debug!(requested = filter.ids.len(), found = parts.len(), "catalog lookup");
        Ok(parts)
    }
}
