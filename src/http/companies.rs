//! Company endpoints.

use crate::error::AppError;
use crate::models::{CreateCompany, UpdateCompany};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// GET /companies
pub async fn list_companies(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let companies = state.db.list_companies().await?;
    Ok(Json(json!({ "companies": companies })))
}

/// GET /companies/:code
pub async fn get_company(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Value>, AppError> {
    let company = state.db.get_company(&code).await?;
    Ok(Json(json!({ "company": company })))
}

/// POST /companies
pub async fn create_company(
    State(state): State<AppState>,
    Json(input): Json<CreateCompany>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let company = state.db.create_company(&input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

/// PUT /companies/:code
pub async fn update_company(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(input): Json<UpdateCompany>,
) -> Result<Json<Value>, AppError> {
    let company = state.db.update_company(&code, &input).await?;
    Ok(Json(json!({ "company": company })))
}

/// DELETE /companies/:code
pub async fn delete_company(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.db.delete_company(&code).await?;
    Ok(Json(json!({ "status": "deleted" })))
}
