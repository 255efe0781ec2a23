use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A purchase recorded against a wholesaler bill. `total` and `due` are
/// derived at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WholesalerPurchase {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub wholesaler_name: String,
    pub bill_no: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,
    pub item: String,
    pub quantity: i64,
    pub rate: f64,
    pub paid: f64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl WholesalerPurchase {
    pub fn total(&self) -> f64 {
        self.quantity as f64 * self.rate
    }

    pub fn due(&self) -> f64 {
        self.total() - self.paid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_and_due_derive_from_quantity_rate_and_paid() {
        let purchase = WholesalerPurchase {
            id: Uuid::new_v4(),
            wholesaler_name: "Sharma Traders".to_string(),
            bill_no: "B-1042".to_string(),
            date: Utc::now(),
            item: "Cement".to_string(),
            quantity: 40,
            rate: 310.0,
            paid: 10000.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(purchase.total(), 12400.0);
        assert_eq!(purchase.due(), 2400.0);
    }
}
