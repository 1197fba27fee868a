use chrono::Utc;
use rocket_core::{Part, PartFilter};
use rocket_shared::filter::{candidates, select};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory parts inventory
///
/// Parts are stored by id behind a reader/writer lock. Everything handed in
/// or out is a copy.
pub struct InventoryRepository {
    parts: RwLock<HashMap<String, Part>>,
}

impl InventoryRepository {
    pub fn new() -> Self {
        Self {
            parts: RwLock::new(HashMap::new()),
        }
    }

    /// Build an inventory from a fixed list of parts.
    pub fn seeded(parts: impl IntoIterator<Item = Part>) -> Result<Self, InventoryError> {
        let mut map = HashMap::new();
        for part in parts {
            validate_part(&part)?;
            if map.contains_key(&part.id) {
                return Err(InventoryError::AlreadyExists(part.id));
            }
            map.insert(part.id.clone(), part);
        }
        Ok(Self {
            parts: RwLock::new(map),
        })
    }

    pub async fn add_part(&self, part: Part) -> Result<(), InventoryError> {
        validate_part(&part)?;

        let mut parts = self.parts.write().await;
        if parts.contains_key(&part.id) {
            return Err(InventoryError::AlreadyExists(part.id));
        }
        tracing::debug!(part_id = %part.id, "part added to inventory");
        parts.insert(part.id.clone(), part);
        Ok(())
    }

    pub async fn get_part(&self, id: &str) -> Result<Part, InventoryError> {
        self.parts
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))
    }

    pub async fn update_part(&self, mut part: Part) -> Result<(), InventoryError> {
        validate_part(&part)?;

        let mut parts = self.parts.write().await;
        let slot = parts
            .get_mut(&part.id)
            .ok_or_else(|| InventoryError::NotFound(part.id.clone()))?;
        part.created_at = slot.created_at;
        part.updated_at = Utc::now();
        *slot = part;
        Ok(())
    }

    pub async fn delete_part(&self, id: &str) -> Result<(), InventoryError> {
        match self.parts.write().await.remove(id) {
            Some(_) => {
                tracing::debug!(part_id = %id, "part removed from inventory");
                Ok(())
            }
            None => Err(InventoryError::NotFound(id.to_string())),
        }
    }

    /// Parts matching `filter`: ids pre-select the candidates, the remaining
    /// fields are AND-ed on top.
    pub async fn list_parts(&self, filter: &PartFilter) -> Vec<Part> {
        let parts = self.parts.read().await;
        select(candidates(&parts, &filter.ids), filter)
    }
}

impl Default for InventoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_part(part: &Part) -> Result<(), InventoryError> {
    if part.id.is_empty() {
        return Err(InventoryError::InvalidPart("part id is empty".to_string()));
    }
    if part.price < Decimal::ZERO {
        return Err(InventoryError::InvalidPart(format!(
            "part {} has negative price {}",
            part.id, part.price
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InventoryError {
    #[error("Part not found: {0}")]
    NotFound(String),

    #[error("Part already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid part: {0}")]
    InvalidPart(String),
}
