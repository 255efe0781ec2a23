use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: Uuid,
    pub item: String,
    pub quantity: i64,
    pub unit_price: f64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub order_date: DateTime<Utc>,
    pub payment: f64,
}

/// Per-customer ledger with embedded entries. Totals are derived from the
/// entries at read time, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub customer_name: String,
    pub customer_number: String,
    pub entries: Vec<LedgerEntry>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Ledger {
    pub fn total_amount(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.quantity as f64 * e.unit_price)
            .sum()
    }

    pub fn total_paid(&self) -> f64 {
        self.entries.iter().map(|e| e.payment).sum()
    }

    pub fn due_amount(&self) -> f64 {
        self.total_amount() - self.total_paid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(quantity: i64, unit_price: f64, payment: f64) -> LedgerEntry {
        LedgerEntry {
            entry_id: Uuid::new_v4(),
            item: "Cement".to_string(),
            quantity,
            unit_price,
            order_date: Utc::now(),
            payment,
        }
    }

    #[test]
    fn totals_sum_over_entries() {
        let ledger = Ledger {
            id: Uuid::new_v4(),
            customer_name: "Asha".to_string(),
            customer_number: "9000000001".to_string(),
            entries: vec![entry(5, 350.0, 1000.0), entry(2, 100.0, 200.0)],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(ledger.total_amount(), 1950.0);
        assert_eq!(ledger.total_paid(), 1200.0);
        assert_eq!(ledger.due_amount(), 750.0);
    }
}
