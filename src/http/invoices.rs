//! Invoice endpoints.

use crate::error::AppError;
use crate::models::{CreateInvoice, UpdateInvoice};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// GET /invoices
pub async fn list_invoices(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let invoices = state.db.list_invoices().await?;
    Ok(Json(json!({ "invoices": invoices })))
}

/// GET /invoices/:id
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let invoice = state.db.get_invoice(id).await?;
    Ok(Json(json!({ "invoice": invoice })))
}

/// POST /invoices
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(input): Json<CreateInvoice>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let invoice = state.db.create_invoice(&input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "invoice": invoice }))))
}

/// PUT /invoices/:id
///
/// Requires both `amt` and `paid`; the payment transition runs inside the
/// update.
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateInvoice>,
) -> Result<Json<Value>, AppError> {
    let invoice = state.db.update_invoice(id, &input).await?;
    Ok(Json(json!({ "invoice": invoice })))
}

/// DELETE /invoices/:id
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    state.db.delete_invoice(id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}
