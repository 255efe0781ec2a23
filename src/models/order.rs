use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeliveryStatus {
    Scheduled,
    Delivered,
}

impl DeliveryStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Scheduled" => Some(Self::Scheduled),
            "Delivered" => Some(Self::Delivered),
            _ => None,
        }
    }
}

/// A committed sale. `rate` is a point-in-time copy of the rate card entry;
/// later price changes never touch past orders. `total_amount` and
/// `due_amount` are stored, not computed on read, so every write path must
/// go through [`OrderFinancials::compute`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Human-readable daily sequence id, e.g. "240615-001".
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
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub delivery_datetime: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub order_date: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Derived financial fields, computed explicitly before persistence rather
/// than in a storage-layer save hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderFinancials {
    pub total_amount: f64,
    pub due_amount: f64,
}

impl OrderFinancials {
    /// due may be negative when the customer overpaid; that is surfaced
    /// as-is, not rejected.
    pub fn compute(quantity: i64, rate: f64, paid_amount: f64) -> Self {
        let total_amount = quantity as f64 * rate;
        Self {
            total_amount,
            due_amount: total_amount - paid_amount,
        }
    }
}

/// Per-day order counter, bumped with an atomic `$inc` so two commits on
/// the same day can never draw the same sequence number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyCounter {
    #[serde(rename = "_id")]
    pub id: String,
    pub seq: i64,
}

/// Counter document key for the calendar day of `at`.
pub fn daily_counter_key(at: DateTime<Utc>) -> String {
    format!("orders:{}", at.format("%y%m%d"))
}

/// Daily sequence order id: two-digit year, month, day, then a 3-digit
/// zero-padded sequence.
pub fn daily_order_id(at: DateTime<Utc>, seq: i64) -> String {
    format!("{}-{:03}", at.format("%y%m%d"), seq)
}
