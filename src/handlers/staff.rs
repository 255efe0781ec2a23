use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dtos::staff::{StaffResponse, UpsertStaffRequest};
use crate::error::AppError;
use crate::models::Staff;
use crate::startup::AppState;

pub async fn list_staff(State(state): State<AppState>) -> Result<Json<Vec<StaffResponse>>, AppError> {
    let options = FindOptions::builder()
        .sort(doc! { "staff_name": 1 })
        .build();
    let cursor = state.db.staff().find(doc! {}, options).await?;
    let staff: Vec<Staff> = cursor.try_collect().await?;
    Ok(Json(staff.into_iter().map(StaffResponse::from).collect()))
}

pub async fn create_staff(
    State(state): State<AppState>,
    Json(payload): Json<UpsertStaffRequest>,
) -> Result<(StatusCode, Json<StaffResponse>), AppError> {
    payload.validate()?;

    let now = Utc::now();
    let staff = Staff {
        id: Uuid::new_v4(),
        staff_name: payload.staff_name.trim().to_string(),
        staff_id: payload.staff_id.trim().to_string(),
        role: payload.role.trim().to_string(),
        contact_number: payload.contact_number.trim().to_string(),
        email: payload.email.map(|e| e.trim().to_lowercase()),
        hire_date: payload.hire_date.unwrap_or(now),
        salary: payload.salary,
        created_at: now,
        updated_at: now,
    };

    state.db.staff().insert_one(&staff, None).await.map_err(|e| {
        if crate::error::is_duplicate_key(&e) {
            AppError::BadRequest(anyhow::anyhow!("Staff ID already exists"))
        } else {
            AppError::from(e)
        }
    })?;

    Ok((StatusCode::CREATED, Json(StaffResponse::from(staff))))
}

pub async fn update_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<Uuid>,
    Json(payload): Json<UpsertStaffRequest>,
) -> Result<Json<StaffResponse>, AppError> {
    payload.validate()?;

    let mut set = doc! {
        "staff_name": payload.staff_name.trim(),
        "staff_id": payload.staff_id.trim(),
        "role": payload.role.trim(),
        "contact_number": payload.contact_number.trim(),
        "salary": payload.salary,
        "updated_at": BsonDateTime::from_chrono(Utc::now()),
    };
    if let Some(email) = &payload.email {
        set.insert("email", email.trim().to_lowercase());
    }
    if let Some(hire_date) = payload.hire_date {
        set.insert("hire_date", BsonDateTime::from_chrono(hire_date));
    }

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    let updated = state
        .db
        .staff()
        .find_one_and_update(
            doc! { "_id": staff_id.to_string() },
            doc! { "$set": set },
            options,
        )
        .await
        .map_err(|e| {
            if crate::error::is_duplicate_key(&e) {
                AppError::BadRequest(anyhow::anyhow!("Staff ID already exists"))
            } else {
                AppError::from(e)
            }
        })?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Staff member not found")))?;

    Ok(Json(StaffResponse::from(updated)))
}

pub async fn delete_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state
        .db
        .staff()
        .find_one_and_delete(doc! { "_id": staff_id.to_string() }, None)
        .await?;

    if deleted.is_none() {
        return Err(AppError::NotFound(anyhow::anyhow!("Staff member not found")));
    }

    Ok(Json(json!({ "message": "Staff member deleted successfully" })))
}
