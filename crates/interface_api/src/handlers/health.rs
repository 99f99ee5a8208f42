//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::collections::BTreeMap;

use crate::AppState;
use crate::dto::health::{HealthResponse, IndexResponse};

/// Service index
pub async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    let endpoints = BTreeMap::from([
        ("health", "GET /health"),
        ("create_contact", "POST /crm/contact"),
        ("add_note", "POST /crm/contact/note"),
        ("update_contact", "PATCH /crm/contact"),
    ]);

    Json(IndexResponse {
        message: state.config.app_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}

/// Health check endpoint
///
/// Always answers 200; an unreachable upstream is reported as "degraded".
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = state.crm.upstream_health().await.is_healthy();

    Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        hubspot_connected: connected,
        timestamp: Utc::now(),
    })
}

/// Readiness check (includes upstream reachability)
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    if !state.crm.upstream_health().await.is_healthy() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        hubspot_connected: true,
        timestamp: Utc::now(),
    }))
}
