use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Ledger, LedgerEntry};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddLedgerEntryRequest {
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub customer_name: String,
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub customer_number: String,
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub item: String,
    #[validate(range(min = 1, message = "must be a positive number"))]
    pub quantity: i64,
    #[validate(range(min = 0.0, message = "must be a non-negative number"))]
    pub unit_price: f64,
    pub order_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0, message = "must be a non-negative number"))]
    pub payment: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLedgerEntryRequest {
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub item: String,
    #[validate(range(min = 1, message = "must be a positive number"))]
    pub quantity: i64,
    #[validate(range(min = 0.0, message = "must be a non-negative number"))]
    pub unit_price: f64,
    pub order_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0, message = "must be a non-negative number"))]
    pub payment: f64,
}

#[derive(Debug, Serialize)]
pub struct LedgerEntryResponse {
    pub entry_id: String,
    pub item: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub order_date: String,
    pub payment: f64,
}

impl From<&LedgerEntry> for LedgerEntryResponse {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            entry_id: entry.entry_id.to_string(),
            item: entry.item.clone(),
            quantity: entry.quantity,
            unit_price: entry.unit_price,
            order_date: entry.order_date.to_rfc3339(),
            payment: entry.payment,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LedgerResponse {
    pub id: String,
    pub customer_name: String,
    pub customer_number: String,
    pub entries: Vec<LedgerEntryResponse>,
    pub total_amount: f64,
    pub total_paid: f64,
    pub due_amount: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Ledger> for LedgerResponse {
    fn from(ledger: Ledger) -> Self {
        Self {
            total_amount: ledger.total_amount(),
            total_paid: ledger.total_paid(),
            due_amount: ledger.due_amount(),
            id: ledger.id.to_string(),
            customer_name: ledger.customer_name,
            customer_number: ledger.customer_number,
            entries: ledger.entries.iter().map(LedgerEntryResponse::from).collect(),
            created_at: ledger.created_at.to_rfc3339(),
            updated_at: ledger.updated_at.to_rfc3339(),
        }
    }
}
