mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn rates_are_listed_sorted_by_item_and_type() {
    let app = TestApp::spawn().await;
    app.seed_rate("Sand", "Coarse", 50.0).await;
    app.seed_rate("Cement", "Prism", 350.0).await;
    app.seed_rate("Cement", "Block", 200.0).await;

    let response = app.get("/api/rates").await;
    assert_eq!(200, response.status().as_u16());

    let rates: Vec<Value> = response.json().await.expect("Failed to parse JSON");
    let keys: Vec<(String, String)> = rates
        .iter()
        .map(|r| {
            (
                r["item"].as_str().unwrap().to_string(),
                r["type"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        vec![
            ("Cement".to_string(), "Block".to_string()),
            ("Cement".to_string(), "Prism".to_string()),
            ("Sand".to_string(), "Coarse".to_string()),
        ],
        keys
    );

    app.cleanup().await;
}

#[tokio::test]
async fn posting_an_existing_pair_replaces_the_price_not_the_row() {
    let app = TestApp::spawn().await;
    app.seed_rate("Cement", "Prism", 350.0).await;

    // Same key, different case: still one rate card row.
    let response = app
        .post(
            "/api/rates",
            &json!({ "item": "cement", "type": "PRISM", "rate": 380.0 }),
        )
        .await;
    assert_eq!(201, response.status().as_u16());

    let rates: Vec<Value> = app
        .get("/api/rates")
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(1, rates.len());
    assert_eq!(rates[0]["rate"], 380.0);

    app.cleanup().await;
}

#[tokio::test]
async fn negative_rate_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/api/rates",
            &json!({ "item": "Cement", "type": "Prism", "rate": -1.0 }),
        )
        .await;
    assert_eq!(400, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Validation error");

    app.cleanup().await;
}

#[tokio::test]
async fn rate_can_be_updated_and_deleted_by_id() {
    let app = TestApp::spawn().await;

    let created: Value = app
        .post(
            "/api/rates",
            &json!({ "item": "Cement", "type": "Prism", "rate": 350.0 }),
        )
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    let id = created["id"].as_str().unwrap();

    let response = app
        .put(
            &format!("/api/rates/{}", id),
            &json!({ "item": "Cement", "type": "Prism", "rate": 365.0 }),
        )
        .await;
    assert_eq!(200, response.status().as_u16());
    let updated: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(updated["rate"], 365.0);

    let response = app.delete(&format!("/api/rates/{}", id)).await;
    assert_eq!(200, response.status().as_u16());

    let rates: Vec<Value> = app
        .get("/api/rates")
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    assert!(rates.is_empty());

    app.cleanup().await;
}

#[tokio::test]
async fn price_changes_do_not_rewrite_committed_orders() {
    let app = TestApp::spawn().await;
    app.seed_rate("Cement", "Prism", 350.0).await;
    app.seed_inventory("Cement", "Prism", 100, 300.0, 10).await;

    let order: Value = app
        .post(
            "/api/orders",
            &common::order_body("Cement", "Prism", 5, 1000.0),
        )
        .await
        .json()
        .await
        .expect("Failed to parse JSON");

    app.seed_rate("Cement", "Prism", 999.0).await;

    let fetched: Value = app
        .get(&format!("/api/orders/{}", order["id"].as_str().unwrap()))
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(fetched["rate"], 350.0);
    assert_eq!(fetched["total_amount"], 1750.0);

    app.cleanup().await;
}
