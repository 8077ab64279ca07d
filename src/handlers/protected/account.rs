// handlers/protected/account.rs - GET /api/auth/me, PUT /api/auth/update-categories

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::CategoriesResponse;

pub async fn me(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(state.accounts().me(user.id).await?))
}

pub async fn update_categories(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<CategoriesResponse> {
    let Json(payload) = payload?;
    Ok(ApiResponse::success(
        state.accounts().update_categories(user.id, &payload).await?,
    ))
}
