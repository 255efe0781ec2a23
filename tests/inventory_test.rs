mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn stock_status_is_derived_from_quantity_and_threshold() {
    let app = TestApp::spawn().await;
    app.seed_inventory("Cement", "Prism", 100, 300.0, 10).await;
    app.seed_inventory("Cement", "Block", 8, 150.0, 10).await;
    app.seed_inventory("Sand", "Coarse", 0, 50.0, 5).await;

    let items: Vec<Value> = app
        .get("/api/inventory")
        .await
        .json()
        .await
        .expect("Failed to parse JSON");

    let status_of = |item: &str, item_type: &str| {
        items
            .iter()
            .find(|i| i["item"] == item && i["type"] == item_type)
            .map(|i| i["status"].as_str().unwrap().to_string())
            .unwrap()
    };
    assert_eq!("In Stock", status_of("Cement", "Prism"));
    assert_eq!("Low Stock", status_of("Cement", "Block"));
    assert_eq!("Out of Stock", status_of("Sand", "Coarse"));

    app.cleanup().await;
}

#[tokio::test]
async fn restocking_an_existing_pair_adds_quantity() {
    let app = TestApp::spawn().await;
    app.seed_inventory("Cement", "Prism", 100, 300.0, 10).await;

    let response = app
        .post(
            "/api/inventory",
            &json!({
                "item": "cement",
                "type": "prism",
                "quantity": 40,
                "unit_price": 320.0,
                "threshold": 15,
            }),
        )
        .await;
    assert_eq!(201, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["quantity"], 140);
    assert_eq!(body["unit_price"], 320.0);
    assert_eq!(body["threshold"], 15);

    // Still one record for the pair.
    let items: Vec<Value> = app
        .get("/api/inventory")
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(1, items.len());

    app.cleanup().await;
}

#[tokio::test]
async fn negative_values_are_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/api/inventory",
            &json!({
                "item": "Cement",
                "type": "Prism",
                "quantity": -1,
                "unit_price": -2.0,
                "threshold": -3,
            }),
        )
        .await;
    assert_eq!(400, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Validation error");
    assert_eq!(3, body["errors"].as_array().unwrap().len());

    app.cleanup().await;
}

#[tokio::test]
async fn put_replaces_fields_instead_of_adding() {
    let app = TestApp::spawn().await;

    let created: Value = app
        .post(
            "/api/inventory",
            &json!({
                "item": "Cement",
                "type": "Prism",
                "quantity": 100,
                "unit_price": 300.0,
                "threshold": 10,
            }),
        )
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    let id = created["id"].as_str().unwrap();

    let response = app
        .put(
            &format!("/api/inventory/{}", id),
            &json!({
                "item": "Cement",
                "type": "Prism",
                "quantity": 60,
                "unit_price": 310.0,
                "threshold": 12,
            }),
        )
        .await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["quantity"], 60);
    assert_eq!(body["unit_price"], 310.0);

    app.cleanup().await;
}

#[tokio::test]
async fn inventory_item_can_be_fetched_and_deleted() {
    let app = TestApp::spawn().await;

    let created: Value = app
        .post(
            "/api/inventory",
            &json!({
                "item": "Cement",
                "type": "Prism",
                "quantity": 100,
                "unit_price": 300.0,
                "threshold": 10,
            }),
        )
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    let id = created["id"].as_str().unwrap();

    let fetched = app.get(&format!("/api/inventory/{}", id)).await;
    assert_eq!(200, fetched.status().as_u16());

    let response = app.delete(&format!("/api/inventory/{}", id)).await;
    assert_eq!(200, response.status().as_u16());

    assert_eq!(404, app.get(&format!("/api/inventory/{}", id)).await.status());

    app.cleanup().await;
}
