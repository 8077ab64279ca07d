// handlers/public/health.rs - service root, health probe and JSON 404

use axum::{extract::State, http::StatusCode, http::Uri, response::Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET / - service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Expense Tracker API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "auth": ["/api/auth/register", "/api/auth/login", "/api/auth/me", "/api/auth/update-categories"],
            "expenses": ["/api/expenses", "/api/expenses/:id", "/api/expenses/summary/stats"]
        }
    }))
}

/// GET /health, GET /api/health - 503 when the store does not answer
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, code, database) = match state.store.ping().await {
        Ok(()) => ("ok", StatusCode::OK, "connected"),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            ("error", StatusCode::SERVICE_UNAVAILABLE, "disconnected")
        }
    };

    (
        code,
        Json(json!({
            "status": status,
            "timestamp": Utc::now(),
            "database": database,
            "store": state.store.backend(),
        })),
    )
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Route {} not found", uri.path()))
}
