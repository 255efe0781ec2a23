use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Rate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertRateRequest {
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub item: String,
    #[serde(rename = "type")]
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub item_type: String,
    #[validate(range(min = 0.0, message = "must be a non-negative number"))]
    pub rate: f64,
}

#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub id: String,
    pub item: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub rate: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Rate> for RateResponse {
    fn from(rate: Rate) -> Self {
        Self {
            id: rate.id.to_string(),
            item: rate.item,
            item_type: rate.item_type,
            rate: rate.rate,
            created_at: rate.created_at.to_rfc3339(),
            updated_at: rate.updated_at.to_rfc3339(),
        }
    }
}
