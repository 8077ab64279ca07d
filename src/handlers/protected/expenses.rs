// handlers/protected/expenses.rs - /api/expenses CRUD and summary

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::{Expense, ExpenseListResponse, ExpenseSummary};
use crate::error::ApiError;
use crate::filter::{ExpenseListQuery, SummaryQuery};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, MessageResponse};
use crate::services::expense_service::EXPENSE_REMOVED;

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(q)| q)
        .map_err(|rejection| ApiError::validation_error(rejection.body_text(), None))
}

/// GET /api/expenses?page&limit&category&startDate&endDate
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<ExpenseListQuery>, QueryRejection>,
) -> ApiResult<ExpenseListResponse> {
    let query = query_params(query)?;
    Ok(ApiResponse::success(state.expenses().list(user.id, &query).await?))
}

/// GET /api/expenses/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Expense> {
    Ok(ApiResponse::success(state.expenses().get(user.id, &id).await?))
}

/// POST /api/expenses → 201
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Expense> {
    let Json(payload) = payload?;
    Ok(ApiResponse::created(state.expenses().create(user.id, &payload).await?))
}

/// PUT /api/expenses/:id - partial update of the fields present
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Expense> {
    let Json(payload) = payload?;
    Ok(ApiResponse::success(
        state.expenses().update(user.id, &id, &payload).await?,
    ))
}

/// DELETE /api/expenses/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    state.expenses().delete(user.id, &id).await?;
    Ok(ApiResponse::success(MessageResponse::new(EXPENSE_REMOVED)))
}

/// GET /api/expenses/summary/stats?startDate&endDate
pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> ApiResult<ExpenseSummary> {
    let query = query_params(query)?;
    Ok(ApiResponse::success(state.expenses().summary(user.id, &query).await?))
}
