use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::WholesalerPurchase;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertWholesalerPurchaseRequest {
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub wholesaler_name: String,
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub bill_no: String,
    pub date: Option<DateTime<Utc>>,
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub item: String,
    #[validate(range(min = 0, message = "must be a non-negative number"))]
    pub quantity: i64,
    #[validate(range(min = 0.0, message = "must be a non-negative number"))]
    pub rate: f64,
    #[validate(range(min = 0.0, message = "must be a non-negative number"))]
    pub paid: f64,
}

#[derive(Debug, Serialize)]
pub struct WholesalerPurchaseResponse {
    pub id: String,
    pub wholesaler_name: String,
    pub bill_no: String,
    pub date: String,
    pub item: String,
    pub quantity: i64,
    pub rate: f64,
    pub paid: f64,
    pub total: f64,
    pub due: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<WholesalerPurchase> for WholesalerPurchaseResponse {
    fn from(purchase: WholesalerPurchase) -> Self {
        Self {
            total: purchase.total(),
            due: purchase.due(),
            id: purchase.id.to_string(),
            wholesaler_name: purchase.wholesaler_name,
            bill_no: purchase.bill_no,
            date: purchase.date.to_rfc3339(),
            item: purchase.item,
            quantity: purchase.quantity,
            rate: purchase.rate,
            paid: purchase.paid,
            created_at: purchase.created_at.to_rfc3339(),
            updated_at: purchase.updated_at.to_rfc3339(),
        }
    }
}
