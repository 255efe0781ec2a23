use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{InventoryItem, StockStatus};

/// POST is an additive upsert: an existing (item, type) gets its quantity
/// increased and price/threshold refreshed, a new pair is created.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertInventoryRequest {
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub item: String,
    #[serde(rename = "type")]
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub item_type: String,
    #[validate(range(min = 0, message = "must be a non-negative number"))]
    pub quantity: i64,
    #[validate(range(min = 0.0, message = "must be a non-negative number"))]
    pub unit_price: f64,
    #[validate(range(min = 0, message = "must be a non-negative number"))]
    pub threshold: i64,
}

#[derive(Debug, Serialize)]
pub struct InventoryResponse {
    pub id: String,
    pub item: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub threshold: i64,
    pub status: StockStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<InventoryItem> for InventoryResponse {
    fn from(item: InventoryItem) -> Self {
        let status = StockStatus::derive(item.quantity, item.threshold);
        Self {
            id: item.id.to_string(),
            item: item.item,
            item_type: item.item_type,
            quantity: item.quantity,
            unit_price: item.unit_price,
            threshold: item.threshold,
            status,
            created_at: item.created_at.to_rfc3339(),
            updated_at: item.updated_at.to_rfc3339(),
        }
    }
}
