//! Customer ledger endpoints. A ledger is one document per customer with
//! embedded entries; totals are derived on the way out, never stored.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, DateTime as BsonDateTime},
    options::FindOptions,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dtos::ledgers::{AddLedgerEntryRequest, LedgerResponse, UpdateLedgerEntryRequest};
use crate::error::AppError;
use crate::models::{Ledger, LedgerEntry};
use crate::startup::AppState;

pub async fn list_ledgers(
    State(state): State<AppState>,
) -> Result<Json<Vec<LedgerResponse>>, AppError> {
    let options = FindOptions::builder()
        .sort(doc! { "customer_name": 1 })
        .build();
    let cursor = state.db.ledgers().find(doc! {}, options).await?;
    let ledgers: Vec<Ledger> = cursor.try_collect().await?;
    Ok(Json(ledgers.into_iter().map(LedgerResponse::from).collect()))
}

pub async fn get_ledger(
    State(state): State<AppState>,
    Path(customer_number): Path<String>,
) -> Result<Json<LedgerResponse>, AppError> {
    let ledger = find_ledger(&state, &customer_number).await?;
    Ok(Json(LedgerResponse::from(ledger)))
}

/// Append an entry to the customer's ledger, creating the ledger when the
/// customer number is new.
pub async fn add_ledger_entry(
    State(state): State<AppState>,
    Json(payload): Json<AddLedgerEntryRequest>,
) -> Result<(StatusCode, Json<LedgerResponse>), AppError> {
    payload.validate()?;

    let customer_number = payload.customer_number.trim().to_string();
    let entry = LedgerEntry {
        entry_id: Uuid::new_v4(),
        item: payload.item.trim().to_string(),
        quantity: payload.quantity,
        unit_price: payload.unit_price,
        order_date: payload.order_date.unwrap_or_else(Utc::now),
        payment: payload.payment,
    };

    let existing = state
        .db
        .ledgers()
        .find_one(doc! { "customer_number": &customer_number }, None)
        .await?;

    let saved = match existing {
        Some(ledger) => {
            let entry_bson = to_bson(&entry)
                .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;
            state
                .db
                .ledgers()
                .update_one(
                    doc! { "_id": ledger.id.to_string() },
                    doc! {
                        "$push": { "entries": entry_bson },
                        "$set": { "updated_at": BsonDateTime::from_chrono(Utc::now()) },
                    },
                    None,
                )
                .await?;
            find_ledger(&state, &customer_number).await?
        }
        None => {
            let now = Utc::now();
            let ledger = Ledger {
                id: Uuid::new_v4(),
                customer_name: payload.customer_name.trim().to_string(),
                customer_number,
                entries: vec![entry],
                created_at: now,
                updated_at: now,
            };
            state
                .db
                .ledgers()
                .insert_one(&ledger, None)
                .await
                .map_err(|e| {
                    if crate::error::is_duplicate_key(&e) {
                        AppError::BadRequest(anyhow::anyhow!(
                            "This customer number is already registered"
                        ))
                    } else {
                        AppError::from(e)
                    }
                })?;
            ledger
        }
    };

    Ok((StatusCode::CREATED, Json(LedgerResponse::from(saved))))
}

pub async fn update_ledger_entry(
    State(state): State<AppState>,
    Path((customer_number, entry_id)): Path<(String, Uuid)>,
    Json(payload): Json<UpdateLedgerEntryRequest>,
) -> Result<Json<LedgerResponse>, AppError> {
    payload.validate()?;

    let ledger = find_ledger(&state, &customer_number).await?;
    let entry = ledger
        .entries
        .iter()
        .find(|e| e.entry_id == entry_id)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Ledger entry not found")))?;

    let mut set = doc! {
        "entries.$.item": payload.item.trim(),
        "entries.$.quantity": payload.quantity,
        "entries.$.unit_price": payload.unit_price,
        "entries.$.payment": payload.payment,
        "updated_at": BsonDateTime::from_chrono(Utc::now()),
    };
    let order_date = payload.order_date.unwrap_or(entry.order_date);
    set.insert("entries.$.order_date", BsonDateTime::from_chrono(order_date));

    state
        .db
        .ledgers()
        .update_one(
            doc! {
                "customer_number": &customer_number,
                "entries.entry_id": entry_id.to_string(),
            },
            doc! { "$set": set },
            None,
        )
        .await?;

    let updated = find_ledger(&state, &customer_number).await?;
    Ok(Json(LedgerResponse::from(updated)))
}

/// Remove one entry; a ledger that ends up empty is deleted outright.
pub async fn delete_ledger_entry(
    State(state): State<AppState>,
    Path((customer_number, entry_id)): Path<(String, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ledger = find_ledger(&state, &customer_number).await?;
    if !ledger.entries.iter().any(|e| e.entry_id == entry_id) {
        return Err(AppError::NotFound(anyhow::anyhow!("Ledger entry not found")));
    }

    state
        .db
        .ledgers()
        .update_one(
            doc! { "customer_number": &customer_number },
            doc! {
                "$pull": { "entries": { "entry_id": entry_id.to_string() } },
                "$set": { "updated_at": BsonDateTime::from_chrono(Utc::now()) },
            },
            None,
        )
        .await?;

    let remaining = find_ledger(&state, &customer_number).await?;
    if remaining.entries.is_empty() {
        state
            .db
            .ledgers()
            .delete_one(doc! { "customer_number": &customer_number }, None)
            .await?;
        return Ok(Json(json!({ "message": "Ledger deleted as it had no entries" })));
    }

    Ok(Json(json!(LedgerResponse::from(remaining))))
}

async fn find_ledger(state: &AppState, customer_number: &str) -> Result<Ledger, AppError> {
    state
        .db
        .ledgers()
        .find_one(doc! { "customer_number": customer_number }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Ledger not found for this customer")))
}
