pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod steps;
pub mod tracing;

use axum::{extract::State, response::Json, routing::{get, post}, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

pub use handlers::{AppServices, AppState};

use crate::auth::AuthRouterExt;

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    pub(crate) fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some("Validation failed".to_string()),
            errors: Some(errors),
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// The `/api/v1` surface: public marketing-site endpoints merged with the
/// bearer-token back-office endpoints.
pub fn api_v1_routes() -> Router<AppState> {
    // Public marketing-site endpoints
    let public = Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .route("/products", get(handlers::products::list_products))
        .route("/products/{id}", get(handlers::products::get_product))
        .route("/process/steps", get(handlers::trading_steps::list_step_templates))
        .route("/rfq/validate", post(handlers::rfq::validate_rfq))
        .route("/rfq", post(handlers::rfq::submit_rfq))
        .route("/track", post(handlers::tracking::track_shipment));

    // Back-office shipment registry
    let shipments = Router::new()
        .route(
            "/shipments",
            get(handlers::shipments::list_shipments).post(handlers::shipments::create_shipment),
        )
        .route(
            "/shipments/{id}",
            get(handlers::shipments::get_shipment).delete(handlers::shipments::delete_shipment),
        )
        .route(
            "/shipments/{id}/notifications",
            post(handlers::shipments::set_notifications),
        )
        .require_auth();

    // Back-office trading-step tracker
    let trading_steps = Router::new()
        .route(
            "/shipments/{id}/steps",
            get(handlers::trading_steps::list_steps).post(handlers::trading_steps::add_step),
        )
        .route(
            "/shipments/{id}/steps/{step_number}",
            axum::routing::put(handlers::trading_steps::update_step),
        )
        .route(
            "/shipments/{id}/steps/{step_number}/actions",
            post(handlers::trading_steps::toggle_action),
        )
        .route(
            "/shipments/{id}/steps/{step_number}/complete",
            post(handlers::trading_steps::complete_step),
        )
        .require_auth();

    // Back-office catalog maintenance
    let products_admin = Router::new()
        .route("/products", post(handlers::products::create_product))
        .route(
            "/products/{id}",
            axum::routing::delete(handlers::products::delete_product),
        )
        .require_auth();

    Router::new()
        .merge(public)
        .merge(shipments)
        .merge(trading_steps)
        .merge(products_admin)
}

async fn api_status() -> ApiResult<Value> {
    let version = env!("CARGO_PKG_VERSION");
    let git = option_env!("GIT_HASH").unwrap_or("unknown");
    let build_time = option_env!("BUILD_TIME").unwrap_or("unknown");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "git": git,
        "build_time": build_time,
        "service": "tradedesk-api",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": std::env::var("APP__ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(State(state): State<AppState>) -> ApiResult<Value> {
    let db_status = match db::check_connection(state.db.as_ref()).await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}
