mod common;

use common::TestApp;
use serde_json::{json, Value};

fn purchase_body(bill_no: &str, quantity: i64, rate: f64, paid: f64) -> Value {
    json!({
        "wholesaler_name": "Meghna Traders",
        "bill_no": bill_no,
        "item": "Cement",
        "quantity": quantity,
        "rate": rate,
        "paid": paid,
    })
}

#[tokio::test]
async fn purchase_response_carries_derived_total_and_due() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/wholesaler", &purchase_body("B-101", 40, 310.0, 10000.0))
        .await;
    assert_eq!(201, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["total"], 12400.0);
    assert_eq!(body["due"], 2400.0);

    app.cleanup().await;
}

#[tokio::test]
async fn purchase_can_be_updated_and_deleted() {
    let app = TestApp::spawn().await;

    let created: Value = app
        .post("/api/wholesaler", &purchase_body("B-101", 40, 310.0, 10000.0))
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    let id = created["id"].as_str().unwrap();

    let response = app
        .put(
            &format!("/api/wholesaler/{}", id),
            &purchase_body("B-101", 40, 310.0, 12400.0),
        )
        .await;
    assert_eq!(200, response.status().as_u16());
    let updated: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(updated["due"], 0.0);

    let response = app.delete(&format!("/api/wholesaler/{}", id)).await;
    assert_eq!(200, response.status().as_u16());

    let listed: Vec<Value> = app
        .get("/api/wholesaler")
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    assert!(listed.is_empty());

    app.cleanup().await;
}

#[tokio::test]
async fn blank_bill_number_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/wholesaler", &purchase_body("  ", 40, 310.0, 10000.0))
        .await;
    assert_eq!(400, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Validation error");

    app.cleanup().await;
}

#[tokio::test]
async fn missing_purchase_returns_not_found() {
    let app = TestApp::spawn().await;

    let id = uuid::Uuid::new_v4();
    assert_eq!(
        404,
        app.put(
            &format!("/api/wholesaler/{}", id),
            &purchase_body("B-101", 1, 1.0, 0.0),
        )
        .await
        .status()
    );
    assert_eq!(
        404,
        app.delete(&format!("/api/wholesaler/{}", id)).await.status()
    );

    app.cleanup().await;
}
