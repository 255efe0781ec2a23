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

use crate::dtos::inventory::{InventoryResponse, UpsertInventoryRequest};
use crate::error::AppError;
use crate::models::InventoryItem;
use crate::services::key_collation;
use crate::startup::AppState;

pub async fn list_inventory(
    State(state): State<AppState>,
) -> Result<Json<Vec<InventoryResponse>>, AppError> {
    let options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();
    let cursor = state.db.inventory().find(doc! {}, options).await?;
    let items: Vec<InventoryItem> = cursor.try_collect().await?;
    Ok(Json(items.into_iter().map(InventoryResponse::from).collect()))
}

pub async fn get_inventory_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<InventoryResponse>, AppError> {
    let item = state
        .db
        .inventory()
        .find_one(doc! { "_id": item_id.to_string() }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Inventory item not found")))?;
    Ok(Json(InventoryResponse::from(item)))
}

/// Additive upsert: restocking an existing (item, type) adds to its
/// quantity and refreshes unit price and threshold; a new pair is created.
pub async fn upsert_inventory(
    State(state): State<AppState>,
    Json(payload): Json<UpsertInventoryRequest>,
) -> Result<(StatusCode, Json<InventoryResponse>), AppError> {
    payload.validate()?;

    let item = payload.item.trim().to_string();
    let item_type = payload.item_type.trim().to_string();

    let options = FindOneOptions::builder().collation(key_collation()).build();
    let existing = state
        .db
        .inventory()
        .find_one(doc! { "item": &item, "type": &item_type }, options)
        .await?;

    let saved = match existing {
        Some(current) => {
            let options = FindOneAndUpdateOptions::builder()
                .return_document(ReturnDocument::After)
                .build();
            state
                .db
                .inventory()
                .find_one_and_update(
                    doc! { "_id": current.id.to_string() },
                    doc! {
                        "$inc": { "quantity": payload.quantity },
                        "$set": {
                            "unit_price": payload.unit_price,
                            "threshold": payload.threshold,
                            "updated_at": BsonDateTime::from_chrono(Utc::now()),
                        },
                    },
                    options,
                )
                .await?
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Inventory item not found")))?
        }
        None => {
            let now = Utc::now();
            let new_item = InventoryItem {
                id: Uuid::new_v4(),
                item,
                item_type,
                quantity: payload.quantity,
                unit_price: payload.unit_price,
                threshold: payload.threshold,
                created_at: now,
                updated_at: now,
            };
            state.db.inventory().insert_one(&new_item, None).await?;
            new_item
        }
    };

    Ok((StatusCode::CREATED, Json(InventoryResponse::from(saved))))
}

/// Full replacement of one record's fields, unlike the additive POST.
pub async fn update_inventory_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpsertInventoryRequest>,
) -> Result<Json<InventoryResponse>, AppError> {
    payload.validate()?;

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    let updated = state
        .db
        .inventory()
        .find_one_and_update(
            doc! { "_id": item_id.to_string() },
            doc! { "$set": {
                "item": payload.item.trim(),
                "type": payload.item_type.trim(),
                "quantity": payload.quantity,
                "unit_price": payload.unit_price,
                "threshold": payload.threshold,
                "updated_at": BsonDateTime::from_chrono(Utc::now()),
            }},
            options,
        )
        .await
        .map_err(|e| {
            if crate::error::is_duplicate_key(&e) {
                AppError::BadRequest(anyhow::anyhow!(
                    "An item with this name and type already exists"
                ))
            } else {
                AppError::from(e)
            }
        })?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Inventory item not found")))?;

    Ok(Json(InventoryResponse::from(updated)))
}

pub async fn delete_inventory_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state
        .db
        .inventory()
        .find_one_and_delete(doc! { "_id": item_id.to_string() }, None)
        .await?;

    if deleted.is_none() {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Inventory item not found"
        )));
    }

    Ok(Json(json!({ "message": "Inventory item deleted successfully" })))
}
