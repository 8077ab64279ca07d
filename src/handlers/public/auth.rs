// handlers/public/auth.rs - POST /api/auth/register, POST /api/auth/login

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AuthResponse;

/// POST /api/auth/register - `{name, email, password}` → 201 `{token, user}`
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<AuthResponse> {
    let Json(payload) = payload?;
    let response = state.accounts().register(&payload).await?;
    Ok(ApiResponse::created(response))
}

/// POST /api/auth/login - `{email, password}` → `{token, user}`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<AuthResponse> {
    let Json(payload) = payload?;
    let response = state.accounts().login(&payload).await?;
    Ok(ApiResponse::success(response))
}
