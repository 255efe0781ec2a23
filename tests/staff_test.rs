mod common;

use common::TestApp;
use serde_json::{json, Value};

fn staff_body(staff_id: &str) -> Value {
    json!({
        "staff_name": "Karim Mia",
        "staff_id": staff_id,
        "role": "Delivery",
        "contact_number": "01822000000",
        "email": "karim@example.com",
        "salary": 15000.0,
    })
}

#[tokio::test]
async fn staff_member_can_be_created_listed_updated_and_deleted() {
    let app = TestApp::spawn().await;

    let response = app.post("/api/staff", &staff_body("EMP-001")).await;
    assert_eq!(201, response.status().as_u16());
    let created: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(created["staff_id"], "EMP-001");
    assert_eq!(created["email"], "karim@example.com");
    let id = created["id"].as_str().unwrap();

    let listed: Vec<Value> = app
        .get("/api/staff")
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(1, listed.len());

    let mut update = staff_body("EMP-001");
    update["role"] = Value::from("Manager");
    update["salary"] = Value::from(22000.0);
    let response = app.put(&format!("/api/staff/{}", id), &update).await;
    assert_eq!(200, response.status().as_u16());
    let updated: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(updated["role"], "Manager");
    assert_eq!(updated["salary"], 22000.0);

    let response = app.delete(&format!("/api/staff/{}", id)).await;
    assert_eq!(200, response.status().as_u16());

    let listed: Vec<Value> = app
        .get("/api/staff")
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    assert!(listed.is_empty());

    app.cleanup().await;
}

#[tokio::test]
async fn duplicate_staff_id_is_rejected() {
    let app = TestApp::spawn().await;

    app.post("/api/staff", &staff_body("EMP-001")).await;
    let response = app.post("/api/staff", &staff_body("EMP-001")).await;
    assert_eq!(400, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Staff ID already exists");

    app.cleanup().await;
}

#[tokio::test]
async fn invalid_email_and_blank_fields_are_reported_together() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/api/staff",
            &json!({
                "staff_name": " ",
                "staff_id": "EMP-002",
                "role": "Delivery",
                "contact_number": "01822000000",
                "email": "not-an-email",
                "salary": -5.0,
            }),
        )
        .await;
    assert_eq!(400, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Validation error");
    let joined = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect::<Vec<_>>()
        .join("; ");
    assert!(joined.contains("staff_name"));
    assert!(joined.contains("email"));
    assert!(joined.contains("salary"));

    app.cleanup().await;
}

#[tokio::test]
async fn missing_staff_member_returns_not_found() {
    let app = TestApp::spawn().await;

    let id = uuid::Uuid::new_v4();
    assert_eq!(
        404,
        app.put(&format!("/api/staff/{}", id), &staff_body("EMP-009"))
            .await
            .status()
    );
    assert_eq!(404, app.delete(&format!("/api/staff/{}", id)).await.status());

    app.cleanup().await;
}
