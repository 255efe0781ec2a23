use backoffice_service::config::Config;
use backoffice_service::services::MongoDb;
use backoffice_service::startup::Application;
use mongodb::bson::doc;
use serde_json::{json, Value};
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MongoDb,
    pub db_name: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        if std::env::var("BACKOFFICE_DATABASE_URL").is_err() {
            std::env::set_var("BACKOFFICE_DATABASE_URL", "mongodb://localhost:27017");
        }

        let db_name = format!("backoffice_test_{}", Uuid::new_v4().simple());

        let mut config = Config::from_env().expect("Failed to load configuration");
        config.server.port = 0; // Random port for testing
        config.database.db_name = db_name.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to come up by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
            client,
        }
    }

    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }

    pub async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn seed_rate(&self, item: &str, item_type: &str, rate: f64) {
        let response = self
            .post(
                "/api/rates",
                &json!({ "item": item, "type": item_type, "rate": rate }),
            )
            .await;
        assert_eq!(201, response.status().as_u16(), "failed to seed rate");
    }

    pub async fn seed_inventory(
        &self,
        item: &str,
        item_type: &str,
        quantity: i64,
        unit_price: f64,
        threshold: i64,
    ) {
        let response = self
            .post(
                "/api/inventory",
                &json!({
                    "item": item,
                    "type": item_type,
                    "quantity": quantity,
                    "unit_price": unit_price,
                    "threshold": threshold,
                }),
            )
            .await;
        assert_eq!(201, response.status().as_u16(), "failed to seed inventory");
    }

    /// Read on-hand quantity straight from the store.
    pub async fn inventory_quantity(&self, item: &str, item_type: &str) -> i64 {
        self.db
            .inventory()
            .find_one(doc! { "item": item, "type": item_type }, None)
            .await
            .expect("inventory lookup failed")
            .map(|record| record.quantity)
            .expect("inventory record missing")
    }

    pub async fn order_count(&self) -> u64 {
        self.db
            .orders()
            .count_documents(None, None)
            .await
            .expect("order count failed")
    }
}

/// A well-formed order body; tests override fields as needed.
pub fn order_body(item: &str, item_type: &str, quantity: i64, paid_amount: f64) -> Value {
    json!({
        "customer_name": "Asha Verma",
        "customer_number": "9000000001",
        "item": item,
        "type": item_type,
        "quantity": quantity,
        "paid_amount": paid_amount,
        "delivery_status": "Scheduled",
        "delivery_datetime": "2026-09-01T10:00:00Z",
    })
}
