//! Order commit protocol: price resolution, stock reservation, financial
//! derivation, and the compensation path that keeps orders and inventory
//! from disagreeing.
//!
//! The store offers no cross-document transaction, so the protocol is
//! reservation-first: stock is debited with a single conditional update
//! (debit-if-sufficient), then the order is written. A failed order write
//! rolls the debit back; only a failed rollback surfaces as
//! `ReconciliationRequired`. Up to and including the stock pre-check the
//! protocol is read-only.

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, DateTime as BsonDateTime},
    options::{
        FindOneAndUpdateOptions, FindOneOptions, FindOptions, ReturnDocument, UpdateOptions,
    },
};
use uuid::Uuid;

use crate::dtos::orders::{OrderListParams, PlaceOrderRequest, UpdateOrderRequest};
use crate::error::{is_duplicate_key, AppError};
use crate::models::{
    daily_counter_key, daily_order_id, DeliveryStatus, InventoryItem, Order, OrderFinancials, Rate,
};
use crate::services::{key_collation, MongoDb};

fn key_label(item: &str, item_type: &str) -> String {
    format!("{} ({})", item, item_type)
}

#[derive(Clone)]
pub struct OrderService {
    db: MongoDb,
}

impl OrderService {
    pub fn new(db: &MongoDb) -> Self {
        Self { db: db.clone() }
    }

    /// Place a new order. Returns the committed order, or an error with
    /// nothing persisted (except for the explicitly reported
    /// `ReconciliationRequired` case).
    pub async fn place_order(&self, request: PlaceOrderRequest) -> Result<Order, AppError> {
        let item = request.item.trim().to_string();
        let item_type = request.item_type.trim().to_string();
        let delivery_status = request.parsed_delivery_status()?;
        let delivery_datetime = request.parsed_delivery_datetime()?;

        // Steps 1-2 are read-only: price resolution, then stock pre-check.
        let rate = self.resolve_rate(&item, &item_type).await?;

        let inventory = self
            .find_inventory(&item, &item_type)
            .await?
            .ok_or_else(|| AppError::InventoryNotFound {
                requested: key_label(&item, &item_type),
            })?;
        if inventory.quantity < request.quantity {
            return Err(AppError::InsufficientStock {
                available: inventory.quantity,
                requested: request.quantity,
            });
        }

        let financials = OrderFinancials::compute(request.quantity, rate.rate, request.paid_amount);

        let now = Utc::now();
        let seq = self.next_daily_sequence(now).await?;
        let order_id = daily_order_id(now, seq);

        // Reservation: the stock check is re-validated atomically here, so
        // two commits that both passed the pre-check cannot both debit.
        if !self
            .conditional_decrement(&item, &item_type, request.quantity)
            .await?
        {
            return Err(self.stock_failure(&item, &item_type, request.quantity).await);
        }

        let order = Order {
            id: Uuid::new_v4(),
            order_id: order_id.clone(),
            customer_name: request.customer_name.trim().to_string(),
            customer_number: request.customer_number.trim().to_string(),
            item: item.clone(),
            item_type: item_type.clone(),
            quantity: request.quantity,
            rate: rate.rate,
            total_amount: financials.total_amount,
            paid_amount: request.paid_amount,
            due_amount: financials.due_amount,
            delivery_status,
            delivery_datetime,
            order_date: now,
            created_at: now,
            updated_at: now,
        };

        if let Err(err) = self.db.orders().insert_one(&order, None).await {
            tracing::error!(
                order_id = %order_id,
                item = %item,
                item_type = %item_type,
                quantity = request.quantity,
                error = %err,
                "Order write failed after stock debit; rolling back"
            );
            return Err(self
                .rollback_debit(&order_id, &item, &item_type, request.quantity, err)
                .await);
        }

        tracing::info!(
            order_id = %order_id,
            item = %item,
            item_type = %item_type,
            quantity = request.quantity,
            total_amount = financials.total_amount,
            "Order committed"
        );
        Ok(order)
    }

    /// Edit an order: re-resolve the current rate, recompute totals, and
    /// apply only the inventory difference between old and new quantities.
    pub async fn update_order(
        &self,
        id: Uuid,
        request: UpdateOrderRequest,
    ) -> Result<Order, AppError> {
        let existing = self.get_order(id).await?;

        let item = request.item.trim().to_string();
        let item_type = request.item_type.trim().to_string();
        let delivery_status = request.parsed_delivery_status()?;
        let delivery_datetime = request.parsed_delivery_datetime()?;
        let rate = self.resolve_rate(&item, &item_type).await?;
        let financials = OrderFinancials::compute(request.quantity, rate.rate, request.paid_amount);

        let same_key = item.eq_ignore_ascii_case(&existing.item)
            && item_type.eq_ignore_ascii_case(&existing.item_type);

        if same_key {
            self.apply_quantity_delta(&existing, &item, &item_type, request.quantity)
                .await?;
        } else {
            self.move_reservation(&existing, &item, &item_type, request.quantity)
                .await?;
        }

        match self
            .write_order_update(id, &request, &rate, &financials, delivery_status, delivery_datetime)
            .await
        {
            Ok(updated) => Ok(updated),
            Err(err) => {
                tracing::error!(
                    order_id = %existing.order_id,
                    error = %err,
                    "Order update failed after inventory adjustment; rolling back"
                );
                // Undo whatever the inventory step did.
                let rolled_back = if same_key {
                    self.undo_quantity_delta(&existing, &item, &item_type, request.quantity)
                        .await
                } else {
                    self.undo_move_reservation(&existing, &item, &item_type, request.quantity)
                        .await
                };
                if rolled_back {
                    Err(err)
                } else {
                    Err(AppError::ReconciliationRequired {
                        order_id: existing.order_id.clone(),
                        item,
                        item_type,
                        quantity: request.quantity,
                    })
                }
            }
        }
    }

    /// Delete an order and restore the exact quantity it had debited.
    pub async fn delete_order(&self, id: Uuid) -> Result<Order, AppError> {
        let existing = self.get_order(id).await?;

        self.db
            .orders()
            .delete_one(doc! { "_id": id.to_string() }, None)
            .await?;

        // The restore must put back precisely what placement took out.
        match self
            .increment_inventory(&existing.item, &existing.item_type, existing.quantity)
            .await
        {
            Ok(true) => {
                tracing::info!(
                    order_id = %existing.order_id,
                    item = %existing.item,
                    quantity = existing.quantity,
                    "Order deleted, inventory restored"
                );
                Ok(existing)
            }
            Ok(false) | Err(_) => {
                tracing::error!(
                    order_id = %existing.order_id,
                    item = %existing.item,
                    item_type = %existing.item_type,
                    quantity = existing.quantity,
                    "Inventory restore failed after order delete"
                );
                Err(AppError::ReconciliationRequired {
                    order_id: existing.order_id.clone(),
                    item: existing.item.clone(),
                    item_type: existing.item_type.clone(),
                    quantity: existing.quantity,
                })
            }
        }
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Order, AppError> {
        self.db
            .orders()
            .find_one(doc! { "_id": id.to_string() }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))
    }

    pub async fn list_orders(&self, params: &OrderListParams) -> Result<Vec<Order>, AppError> {
        let mut filter = doc! {};
        let mut range = doc! {};
        if let Some(start) = params.start_date {
            range.insert("$gte", BsonDateTime::from_chrono(start));
        }
        if let Some(end) = params.end_date {
            range.insert("$lt", BsonDateTime::from_chrono(end));
        }
        if !range.is_empty() {
            filter.insert("order_date", range);
        }

        let options = FindOptions::builder()
            .sort(doc! { "order_date": -1 })
            .build();
        let cursor = self.db.orders().find(filter, options).await?;
        let orders: Vec<Order> = cursor.try_collect().await?;
        Ok(orders)
    }

    async fn resolve_rate(&self, item: &str, item_type: &str) -> Result<Rate, AppError> {
        let options = FindOneOptions::builder().collation(key_collation()).build();
        let found = self
            .db
            .rates()
            .find_one(doc! { "item": item, "type": item_type }, options)
            .await?;
        match found {
            Some(rate) => Ok(rate),
            None => {
                // Carry the full catalog so the dashboard can offer valid pairs.
                let cursor = self.db.rates().find(doc! {}, None).await?;
                let rates: Vec<Rate> = cursor.try_collect().await?;
                Err(AppError::RateNotFound {
                    requested: key_label(item, item_type),
                    available: rates.iter().map(Rate::key_label).collect(),
                })
            }
        }
    }

    async fn find_inventory(
        &self,
        item: &str,
        item_type: &str,
    ) -> Result<Option<InventoryItem>, AppError> {
        let options = FindOneOptions::builder().collation(key_collation()).build();
        Ok(self
            .db
            .inventory()
            .find_one(doc! { "item": item, "type": item_type }, options)
            .await?)
    }

    /// Debit-if-sufficient in a single update, closing the window between
    /// a stock check and a separate write. Returns false when the guard
    /// did not match (stock consumed concurrently, or record missing).
    async fn conditional_decrement(
        &self,
        item: &str,
        item_type: &str,
        amount: i64,
    ) -> Result<bool, AppError> {
        let options = UpdateOptions::builder().collation(key_collation()).build();
        let result = self
            .db
            .inventory()
            .update_one(
                doc! { "item": item, "type": item_type, "quantity": { "$gte": amount } },
                doc! {
                    "$inc": { "quantity": -amount },
                    "$currentDate": { "updated_at": true },
                },
                options,
            )
            .await?;
        Ok(result.modified_count == 1)
    }

    /// Unconditional credit; false means the inventory record is gone.
    async fn increment_inventory(
        &self,
        item: &str,
        item_type: &str,
        amount: i64,
    ) -> Result<bool, AppError> {
        let options = UpdateOptions::builder().collation(key_collation()).build();
        let result = self
            .db
            .inventory()
            .update_one(
                doc! { "item": item, "type": item_type },
                doc! {
                    "$inc": { "quantity": amount },
                    "$currentDate": { "updated_at": true },
                },
                options,
            )
            .await?;
        Ok(result.modified_count == 1)
    }

    /// Atomic increment-and-read of the per-day counter; never a
    /// count-then-use read, so same-day commits cannot share an id.
    async fn next_daily_sequence(&self, at: DateTime<Utc>) -> Result<i64, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let counter = self
            .db
            .counters()
            .find_one_and_update(
                doc! { "_id": daily_counter_key(at) },
                doc! { "$inc": { "seq": 1i64 } },
                options,
            )
            .await?
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!("Daily counter upsert returned nothing"))
            })?;
        Ok(counter.seq)
    }

    /// Classify a failed conditional decrement by re-reading the record.
    async fn stock_failure(&self, item: &str, item_type: &str, requested: i64) -> AppError {
        match self.find_inventory(item, item_type).await {
            Ok(Some(current)) => AppError::InsufficientStock {
                available: current.quantity,
                requested,
            },
            Ok(None) => AppError::InventoryNotFound {
                requested: key_label(item, item_type),
            },
            Err(err) => err,
        }
    }

    /// Compensation for a failed order write: credit back the debit. If the
    /// credit also fails, the debit is stranded and the caller must be told
    /// the order may exist.
    async fn rollback_debit(
        &self,
        order_id: &str,
        item: &str,
        item_type: &str,
        quantity: i64,
        write_err: mongodb::error::Error,
    ) -> AppError {
        match self.increment_inventory(item, item_type, quantity).await {
            Ok(true) => {
                if is_duplicate_key(&write_err) {
                    AppError::WriteConflict(anyhow::anyhow!("Order id {} already taken", order_id))
                } else {
                    AppError::from(write_err)
                }
            }
            Ok(false) | Err(_) => {
                tracing::error!(
                    order_id = %order_id,
                    item = %item,
                    item_type = %item_type,
                    quantity,
                    "Compensating credit failed; inventory debited without an order"
                );
                AppError::ReconciliationRequired {
                    order_id: order_id.to_string(),
                    item: item.to_string(),
                    item_type: item_type.to_string(),
                    quantity,
                }
            }
        }
    }

    /// Same-key edit: only the difference moves. A positive delta goes
    /// through the same conditional debit as placement.
    async fn apply_quantity_delta(
        &self,
        existing: &Order,
        item: &str,
        item_type: &str,
        new_quantity: i64,
    ) -> Result<(), AppError> {
        let delta = new_quantity - existing.quantity;
        if delta > 0 {
            if !self.conditional_decrement(item, item_type, delta).await? {
                return Err(self.stock_failure(item, item_type, delta).await);
            }
        } else if delta < 0 && !self.increment_inventory(item, item_type, -delta).await? {
            return Err(AppError::InventoryNotFound {
                requested: key_label(item, item_type),
            });
        }
        Ok(())
    }

    /// Inverse of `apply_quantity_delta`; true if fully undone.
    async fn undo_quantity_delta(
        &self,
        existing: &Order,
        item: &str,
        item_type: &str,
        new_quantity: i64,
    ) -> bool {
        let delta = new_quantity - existing.quantity;
        let undone = if delta > 0 {
            self.increment_inventory(item, item_type, delta).await
        } else if delta < 0 {
            self.conditional_decrement(item, item_type, -delta).await
        } else {
            Ok(true)
        };
        matches!(undone, Ok(true))
    }

    /// Key change: debit the new key in full, then return the full old
    /// quantity to the old key. Debit-first keeps the failure mode on the
    /// never-oversell side.
    async fn move_reservation(
        &self,
        existing: &Order,
        item: &str,
        item_type: &str,
        new_quantity: i64,
    ) -> Result<(), AppError> {
        if !self.conditional_decrement(item, item_type, new_quantity).await? {
            return Err(self.stock_failure(item, item_type, new_quantity).await);
        }

        match self
            .increment_inventory(&existing.item, &existing.item_type, existing.quantity)
            .await
        {
            Ok(true) => Ok(()),
            Ok(false) => {
                // Old record gone; undo the new debit and report the gap.
                if matches!(
                    self.increment_inventory(item, item_type, new_quantity).await,
                    Ok(true)
                ) {
                    Err(AppError::InventoryNotFound {
                        requested: key_label(&existing.item, &existing.item_type),
                    })
                } else {
                    Err(AppError::ReconciliationRequired {
                        order_id: existing.order_id.clone(),
                        item: item.to_string(),
                        item_type: item_type.to_string(),
                        quantity: new_quantity,
                    })
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Inverse of `move_reservation`; true if fully undone.
    async fn undo_move_reservation(
        &self,
        existing: &Order,
        item: &str,
        item_type: &str,
        new_quantity: i64,
    ) -> bool {
        let credited = matches!(
            self.increment_inventory(item, item_type, new_quantity).await,
            Ok(true)
        );
        let debited = matches!(
            self.conditional_decrement(&existing.item, &existing.item_type, existing.quantity)
                .await,
            Ok(true)
        );
        credited && debited
    }

    async fn write_order_update(
        &self,
        id: Uuid,
        request: &UpdateOrderRequest,
        rate: &Rate,
        financials: &OrderFinancials,
        delivery_status: DeliveryStatus,
        delivery_datetime: DateTime<Utc>,
    ) -> Result<Order, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let update = doc! {
            "$set": {
                "customer_name": request.customer_name.trim(),
                "customer_number": request.customer_number.trim(),
                "item": request.item.trim(),
                "type": request.item_type.trim(),
                "quantity": request.quantity,
                "rate": rate.rate,
                "total_amount": financials.total_amount,
                "paid_amount": request.paid_amount,
                "due_amount": financials.due_amount,
                "delivery_status": to_bson(&delivery_status)
                    .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?,
                "delivery_datetime": BsonDateTime::from_chrono(delivery_datetime),
                "updated_at": BsonDateTime::from_chrono(Utc::now()),
            }
        };
        self.db
            .orders()
            .find_one_and_update(doc! { "_id": id.to_string() }, update, options)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))
    }
}
