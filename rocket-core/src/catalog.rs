use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rocket_shared::filter::{matches_exact, matches_tags, matches_text, FieldFilter};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Part classification in the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Engine,
    Fuel,
    Porthole,
    Wing,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manufacturer {
    pub name: String,
    pub country: String,
    pub website: Option<String>,
}

/// Physical measurements of a part
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

/// One typed value in a part's free-form metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Int64(i64),
    Double(f64),
    String(String),
}

/// A priced catalog item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Unit price, never negative.
    pub price: Decimal,
    pub stock_quantity: i64,
    pub category: Category,
    #[serde(default)]
    pub dimensions: Dimensions,
    pub manufacturer: Manufacturer,
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: HashMap<String, MetadataValue>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog query: AND across fields, OR within a field, empty matches all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartFilter {
    pub ids: Vec<String>,
    pub names: Vec<String>,
    pub categories: Vec<Category>,
    pub manufacturer_countries: Vec<String>,
    pub tags: Vec<String>,
}

impl PartFilter {
    pub fn by_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

impl FieldFilter<Part> for PartFilter {
    fn is_unconstrained(&self) -> bool {
        self.ids.is_empty()
            && self.names.is_empty()
            && self.categories.is_empty()
            && self.manufacturer_countries.is_empty()
            && self.tags.is_empty()
    }

    fn matches(&self, part: &Part) -> bool {
        matches_text(&self.names, &part.name)
            && matches_exact(&self.categories, &part.category)
            && matches_text(&self.manufacturer_countries, &part.manufacturer.country)
            && matches_tags(&self.tags, &part.tags)
    }
}

/// Read access to the parts catalog, used to price orders
#[async_trait]
pub trait PartCatalog: Send + Sync {
    /// Parts matching `filter`; an empty result is not an error.
    async fn lookup_parts(
        &self,
        filter: &PartFilter,
    ) -> Result<Vec<Part>, Box<dyn std::error::Error + Send + Sync>>;
}
