//! Liveness and service index.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub api_configured: bool,
    pub search_configured: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        api_configured: state.providers.api_configured,
        search_configured: state.providers.search_configured,
    })
}

pub async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Market Intelligence Agent",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health",
    }))
}
