use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::AppError;
use crate::models::{DeliveryStatus, Order};

/// The delivery fields are accepted as text and vetted with the other
/// fields, so one bad value is reported alongside every other violation
/// instead of failing body extraction on its own.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub customer_name: String,
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub customer_number: String,
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub item: String,
    #[serde(rename = "type")]
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub item_type: String,
    #[validate(range(min = 1, message = "must be a positive number"))]
    pub quantity: i64,
    #[validate(range(min = 0.0, message = "must be a non-negative number"))]
    pub paid_amount: f64,
    #[validate(custom(function = valid_delivery_status, message = "must be Scheduled or Delivered"))]
    pub delivery_status: String,
    #[validate(custom(function = valid_rfc3339, message = "must be an RFC 3339 datetime"))]
    pub delivery_datetime: String,
}

impl PlaceOrderRequest {
    /// Callers run `validate()` first; these convert the vetted text.
    pub fn parsed_delivery_status(&self) -> Result<DeliveryStatus, AppError> {
        DeliveryStatus::parse(&self.delivery_status)
            .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Unknown delivery status")))
    }

    pub fn parsed_delivery_datetime(&self) -> Result<DateTime<Utc>, AppError> {
        let parsed = DateTime::parse_from_rfc3339(self.delivery_datetime.trim())
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid delivery datetime: {}", e)))?;
        Ok(parsed.with_timezone(&Utc))
    }
}

fn valid_delivery_status(value: &str) -> Result<(), ValidationError> {
    if DeliveryStatus::parse(value).is_none() {
        return Err(ValidationError::new("delivery_status"));
    }
    Ok(())
}

fn valid_rfc3339(value: &str) -> Result<(), ValidationError> {
    if DateTime::parse_from_rfc3339(value.trim()).is_err() {
        return Err(ValidationError::new("rfc3339"));
    }
    Ok(())
}

/// Edits re-run the same derivation as placement: current rate, recomputed
/// totals, inventory delta.
pub type UpdateOrderRequest = PlaceOrderRequest;

#[derive(Debug, Deserialize)]
pub struct OrderListParams {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub order_id: String,
    pub customer_name: String,
    pub customer_number: String,
    pub item: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub quantity: i64,
    pub rate: f64,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub due_amount: f64,
    pub delivery_status: DeliveryStatus,
    pub delivery_datetime: String,
    pub order_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_string(),
            order_id: order.order_id,
            customer_name: order.customer_name,
            customer_number: order.customer_number,
            item: order.item,
            item_type: order.item_type,
            quantity: order.quantity,
            rate: order.rate,
            total_amount: order.total_amount,
            paid_amount: order.paid_amount,
            due_amount: order.due_amount,
            delivery_status: order.delivery_status,
            delivery_datetime: order.delivery_datetime.to_rfc3339(),
            order_date: order.order_date.to_rfc3339(),
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}
