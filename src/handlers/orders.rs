//! Order endpoints. All mutation goes through [`OrderService`], the single
//! canonical implementation of the commit protocol.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dtos::orders::{OrderListParams, OrderResponse, PlaceOrderRequest, UpdateOrderRequest};
use crate::error::AppError;
use crate::startup::AppState;

pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = state.orders.list_orders(&params).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.orders.get_order(order_id).await?;
    Ok(Json(OrderResponse::from(order)))
}

pub async fn place_order(
    State(state): State<AppState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    payload.validate()?;

    tracing::info!(
        item = %payload.item,
        item_type = %payload.item_type,
        quantity = payload.quantity,
        "Placing order"
    );

    let order = state.orders.place_order(payload).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}

pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    payload.validate()?;

    tracing::info!(order_id = %order_id, "Updating order");

    let order = state.orders.update_order(order_id, payload).await?;
    Ok(Json(OrderResponse::from(order)))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!(order_id = %order_id, "Deleting order");

    state.orders.delete_order(order_id).await?;
    Ok(Json(json!({ "message": "Order deleted" })))
}
