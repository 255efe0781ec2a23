use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Error taxonomy for the order commit protocol and surrounding CRUD surface.
///
/// Everything except `ReconciliationRequired` is recoverable by the caller:
/// nothing has been persisted and the request can be corrected or retried.
/// `ReconciliationRequired` means an inventory write landed without its
/// matching order write (or vice versa) and a compensating write also
/// failed; it is surfaced distinctly so the dashboard never renders it as
/// a generic success or failure.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Rate not found for {requested}")]
    RateNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("Inventory not found for {requested}")]
    InventoryNotFound { requested: String },

    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("Write conflict: {0}")]
    WriteConflict(anyhow::Error),

    #[error("Order {order_id} may be out of sync with inventory for {item} ({item_type})")]
    ReconciliationRequired {
        order_id: String,
        item: String,
        item_type: String,
        quantity: i64,
    },

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// Duplicate-key write errors (Mongo error code 11000).
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == 11000,
        ErrorKind::BulkWrite(failure) => failure
            .write_errors
            .as_ref()
            .map(|errors| errors.iter().any(|we| we.code == 11000))
            .unwrap_or(false),
        _ => false,
    }
}

/// Flatten validator output into one message per violated field, so the
/// caller sees every violation at once rather than just the first.
fn field_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let detail = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, detail)
            })
        })
        .collect();
    messages.sort();
    messages
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            message: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            errors: Option<Vec<String>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<serde_json::Value>,
            #[serde(skip_serializing_if = "Option::is_none")]
            reconciliation_required: Option<bool>,
        }

        let (status, message, errors, details, reconciliation_required) = match self {
            AppError::ValidationError(ref err) => (
                StatusCode::BAD_REQUEST,
                "Validation error".to_string(),
                Some(field_messages(err)),
                None,
                None,
            ),
            AppError::BadRequest(err) => {
                (StatusCode::BAD_REQUEST, err.to_string(), None, None, None)
            }
            AppError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string(), None, None, None),
            AppError::RateNotFound {
                requested,
                available,
            } => (
                StatusCode::BAD_REQUEST,
                "Rate not found for selected item and type".to_string(),
                None,
                Some(json!({ "requested": requested, "available": available })),
                None,
            ),
            AppError::InventoryNotFound { requested } => (
                StatusCode::BAD_REQUEST,
                "Inventory not found for selected item and type".to_string(),
                None,
                Some(json!({ "requested": requested })),
                None,
            ),
            AppError::InsufficientStock {
                available,
                requested,
            } => (
                StatusCode::BAD_REQUEST,
                "Insufficient inventory quantity".to_string(),
                None,
                Some(json!({ "available": available, "requested": requested })),
                None,
            ),
            AppError::WriteConflict(err) => (
                StatusCode::CONFLICT,
                "Write conflict, please retry".to_string(),
                None,
                Some(json!({ "cause": err.to_string() })),
                None,
            ),
            AppError::ReconciliationRequired {
                order_id,
                item,
                item_type,
                quantity,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Order and inventory records may be out of sync; manual reconciliation required"
                    .to_string(),
                None,
                Some(json!({
                    "order_id": order_id,
                    "item": item,
                    "type": item_type,
                    "quantity": quantity,
                })),
                Some(true),
            ),
            AppError::DatabaseError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
                None,
                Some(json!({ "cause": err.to_string() })),
                None,
            ),
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
                Some(json!({ "cause": err.to_string() })),
                None,
            ),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                None,
                Some(json!({ "cause": err.to_string() })),
                None,
            ),
        };

        (
            status,
            Json(ErrorResponse {
                message,
                errors,
                details,
                reconciliation_required,
            }),
        )
            .into_response()
    }
}
