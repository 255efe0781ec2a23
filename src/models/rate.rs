use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One rate card entry. (item, type) is unique, case-insensitive and
/// trimmed; `rate` is the current unit price and is read-only to the order
/// commit protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rate {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub item: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub rate: f64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Rate {
    /// "item (type)" label used in diagnostics when a requested pair has no
    /// rate entry.
    pub fn key_label(&self) -> String {
        format!("{} ({})", self.item, self.item_type)
    }
}
