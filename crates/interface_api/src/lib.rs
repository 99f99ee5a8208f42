//! HTTP API Layer
//!
//! This crate provides the REST API for the CRM facade using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for contacts and health
//! - **Middleware**: Request logging with request ids
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(crm_service, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_contact::CrmService;

use crate::config::ApiConfig;
use crate::handlers::{contact, health};
use crate::middleware::request_log_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub crm: CrmService,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `crm` - Contact orchestration service, already wired to its upstream port
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(crm: CrmService, config: ApiConfig) -> Router {
    let state = AppState { crm, config };

    let public_routes = Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let crm_routes = Router::new()
        .route("/contact", post(contact::create_contact).patch(contact::update_contact))
        .route("/contact/note", post(contact::add_note));

    Router::new()
        .merge(public_routes)
        .nest("/crm", crm_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(request_log_middleware))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
