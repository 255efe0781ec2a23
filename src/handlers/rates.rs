use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    options::{FindOneAndUpdateOptions, FindOneOptions, FindOptions, ReturnDocument},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dtos::rates::{RateResponse, UpsertRateRequest};
use crate::error::AppError;
use crate::models::Rate;
use crate::services::key_collation;
use crate::startup::AppState;

pub async fn list_rates(State(state): State<AppState>) -> Result<Json<Vec<RateResponse>>, AppError> {
    let options = FindOptions::builder()
        .sort(doc! { "item": 1, "type": 1 })
        .build();
    let cursor = state.db.rates().find(doc! {}, options).await?;
    let rates: Vec<Rate> = cursor.try_collect().await?;
    Ok(Json(rates.into_iter().map(RateResponse::from).collect()))
}

/// Create or refresh the rate for an (item, type) pair. An existing pair
/// gets its price replaced; past orders keep their captured rate.
pub async fn upsert_rate(
    State(state): State<AppState>,
    Json(payload): Json<UpsertRateRequest>,
) -> Result<(StatusCode, Json<RateResponse>), AppError> {
    payload.validate()?;

    let item = payload.item.trim().to_string();
    let item_type = payload.item_type.trim().to_string();

    let options = FindOneOptions::builder().collation(key_collation()).build();
    let existing = state
        .db
        .rates()
        .find_one(doc! { "item": &item, "type": &item_type }, options)
        .await?;

    let saved = match existing {
        Some(rate) => {
            let options = FindOneAndUpdateOptions::builder()
                .return_document(ReturnDocument::After)
                .build();
            state
                .db
                .rates()
                .find_one_and_update(
                    doc! { "_id": rate.id.to_string() },
                    doc! { "$set": {
                        "rate": payload.rate,
                        "updated_at": BsonDateTime::from_chrono(Utc::now()),
                    }},
                    options,
                )
                .await?
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Rate not found")))?
        }
        None => {
            let now = Utc::now();
            let rate = Rate {
                id: Uuid::new_v4(),
                item,
                item_type,
                rate: payload.rate,
                created_at: now,
                updated_at: now,
            };
            state.db.rates().insert_one(&rate, None).await?;
            rate
        }
    };

    Ok((StatusCode::CREATED, Json(RateResponse::from(saved))))
}

pub async fn update_rate(
    State(state): State<AppState>,
    Path(rate_id): Path<Uuid>,
    Json(payload): Json<UpsertRateRequest>,
) -> Result<Json<RateResponse>, AppError> {
    payload.validate()?;

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    let updated = state
        .db
        .rates()
        .find_one_and_update(
            doc! { "_id": rate_id.to_string() },
            doc! { "$set": {
                "item": payload.item.trim(),
                "type": payload.item_type.trim(),
                "rate": payload.rate,
                "updated_at": BsonDateTime::from_chrono(Utc::now()),
            }},
            options,
        )
        .await
        .map_err(|e| {
            if crate::error::is_duplicate_key(&e) {
                AppError::BadRequest(anyhow::anyhow!("Rate already exists for this item and type"))
            } else {
                AppError::from(e)
            }
        })?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Rate not found")))?;

    Ok(Json(RateResponse::from(updated)))
}

pub async fn delete_rate(
    State(state): State<AppState>,
    Path(rate_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state
        .db
        .rates()
        .find_one_and_delete(doc! { "_id": rate_id.to_string() }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Rate not found")))?;

    Ok(Json(json!({
        "message": "Rate deleted successfully",
        "deleted_rate": RateResponse::from(deleted),
    })))
}
