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

use crate::dtos::wholesaler::{UpsertWholesalerPurchaseRequest, WholesalerPurchaseResponse};
use crate::error::AppError;
use crate::models::WholesalerPurchase;
use crate::startup::AppState;

pub async fn list_purchases(
    State(state): State<AppState>,
) -> Result<Json<Vec<WholesalerPurchaseResponse>>, AppError> {
    let options = FindOptions::builder().sort(doc! { "date": -1 }).build();
    let cursor = state.db.wholesaler_purchases().find(doc! {}, options).await?;
    let purchases: Vec<WholesalerPurchase> = cursor.try_collect().await?;
    Ok(Json(
        purchases
            .into_iter()
            .map(WholesalerPurchaseResponse::from)
            .collect(),
    ))
}

pub async fn create_purchase(
    State(state): State<AppState>,
    Json(payload): Json<UpsertWholesalerPurchaseRequest>,
) -> Result<(StatusCode, Json<WholesalerPurchaseResponse>), AppError> {
    payload.validate()?;

    let now = Utc::now();
    let purchase = WholesalerPurchase {
        id: Uuid::new_v4(),
        wholesaler_name: payload.wholesaler_name.trim().to_string(),
        bill_no: payload.bill_no.trim().to_string(),
        date: payload.date.unwrap_or(now),
        item: payload.item.trim().to_string(),
        quantity: payload.quantity,
        rate: payload.rate,
        paid: payload.paid,
        created_at: now,
        updated_at: now,
    };

    state
        .db
        .wholesaler_purchases()
        .insert_one(&purchase, None)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(WholesalerPurchaseResponse::from(purchase)),
    ))
}

pub async fn update_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
    Json(payload): Json<UpsertWholesalerPurchaseRequest>,
) -> Result<Json<WholesalerPurchaseResponse>, AppError> {
    payload.validate()?;

    let mut set = doc! {
        "wholesaler_name": payload.wholesaler_name.trim(),
        "bill_no": payload.bill_no.trim(),
        "item": payload.item.trim(),
        "quantity": payload.quantity,
        "rate": payload.rate,
        "paid": payload.paid,
        "updated_at": BsonDateTime::from_chrono(Utc::now()),
    };
    if let Some(date) = payload.date {
        set.insert("date", BsonDateTime::from_chrono(date));
    }

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    let updated = state
        .db
        .wholesaler_purchases()
        .find_one_and_update(
            doc! { "_id": purchase_id.to_string() },
            doc! { "$set": set },
            options,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Wholesaler record not found")))?;

    Ok(Json(WholesalerPurchaseResponse::from(updated)))
}

pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state
        .db
        .wholesaler_purchases()
        .find_one_and_delete(doc! { "_id": purchase_id.to_string() }, None)
        .await?;

    if deleted.is_none() {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Wholesaler record not found"
        )));
    }

    Ok(Json(json!({ "message": "Wholesaler record deleted successfully" })))
}
