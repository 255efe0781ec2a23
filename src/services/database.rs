use crate::error::AppError;
use crate::models::{DailyCounter, InventoryItem, Ledger, Order, Rate, Staff, WholesalerPurchase};
use mongodb::{
    bson::doc,
    options::{Collation, CollationStrength, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};

/// Collation applied to every (item, type) lookup and index so key matching
/// is case-insensitive ("Cement"/"cement" are the same rate card row).
pub fn key_collation() -> Collation {
    Collation::builder()
        .locale("en")
        .strength(CollationStrength::Secondary)
        .build()
}

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        let key_index = |name: &str| {
            IndexModel::builder()
                .keys(doc! { "item": 1, "type": 1 })
                .options(
                    IndexOptions::builder()
                        .name(name.to_string())
                        .unique(true)
                        .collation(key_collation())
                        .build(),
                )
                .build()
        };

        self.rates().create_index(key_index("rate_key_idx"), None).await?;
        self.inventory()
            .create_index(key_index("inventory_key_idx"), None)
            .await?;

        // Daily sequence ids must be unique even if the counter collection
        // is ever reset by hand.
        let order_id_index = IndexModel::builder()
            .keys(doc! { "order_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("order_id_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        let order_date_index = IndexModel::builder()
            .keys(doc! { "order_date": -1 })
            .options(
                IndexOptions::builder()
                    .name("order_date_idx".to_string())
                    .build(),
            )
            .build();
        self.orders()
            .create_indexes([order_id_index, order_date_index], None)
            .await?;

        let customer_index = IndexModel::builder()
            .keys(doc! { "customer_number": 1 })
            .options(
                IndexOptions::builder()
                    .name("ledger_customer_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.ledgers().create_index(customer_index, None).await?;

        let staff_id_index = IndexModel::builder()
            .keys(doc! { "staff_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("staff_id_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.staff().create_index(staff_id_index, None).await?;

        tracing::info!("Database indexes initialized");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    pub fn rates(&self) -> Collection<Rate> {
        self.db.collection("rates")
    }

    pub fn inventory(&self) -> Collection<InventoryItem> {
        self.db.collection("inventory")
    }

    pub fn orders(&self) -> Collection<Order> {
        self.db.collection("orders")
    }

    pub fn counters(&self) -> Collection<DailyCounter> {
        self.db.collection("counters")
    }

    pub fn ledgers(&self) -> Collection<Ledger> {
        self.db.collection("ledgers")
    }

    pub fn staff(&self) -> Collection<Staff> {
        self.db.collection("staff")
    }

    pub fn wholesaler_purchases(&self) -> Collection<WholesalerPurchase> {
        self.db.collection("wholesaler_purchases")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
