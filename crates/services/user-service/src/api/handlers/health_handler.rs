//! Health check handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;

use crate::api::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: StoreHealth,
}

/// Store backend health with optional error message.
#[derive(Debug, Serialize)]
pub struct StoreHealth {
    pub backend: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Health check endpoint - pings the database when one is in use.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let ping = match &state.database {
        Some(db) => db.ping().await.map_err(|e| e.to_string()),
        // The in-memory store has nothing to reach
        None => Ok(()),
    };

    let store = match ping {
        Ok(()) => StoreHealth {
            backend: state.store.to_string(),
            status: "healthy".to_string(),
            error: None,
        },
        Err(e) => StoreHealth {
            backend: state.store.to_string(),
            status: "unhealthy".to_string(),
            error: Some(e),
        },
    };

    let healthy = store.error.is_none();
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        store,
    };

    if healthy {
        (StatusCode::OK, Json(response)).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
    }
}
