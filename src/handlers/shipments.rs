use crate::{
    auth::AuthUser, entities::shipment, services::shipments::NewShipment, ApiResponse, ApiResult,
    AppState,
};
use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "id": "990e8400-e29b-41d4-a716-446655440000",
    "display_id": "SHP-001",
    "client_id": "CL-ACME",
    "client_name": "Acme Co",
    "client_email": "logistics@acme.example",
    "client_phone": "+1 555 0100",
    "notifications_enabled": true,
    "created_at": "2026-03-01T10:30:00Z",
    "updated_at": "2026-03-01T10:30:00Z"
}))]
pub struct ShipmentSummary {
    /// Shipment UUID
    pub id: Uuid,
    /// Human-readable identifier used for client tracking
    #[schema(example = "SHP-001")]
    pub display_id: String,
    /// Operator-supplied client reference
    pub client_id: String,
    /// Client company or contact name
    #[schema(example = "Acme Co")]
    pub client_name: String,
    /// Client contact email
    pub client_email: String,
    /// Optional client phone number
    pub client_phone: Option<String>,
    /// Whether progress notifications are enabled
    pub notifications_enabled: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<shipment::Model> for ShipmentSummary {
    fn from(model: shipment::Model) -> Self {
        Self {
            id: model.id,
            display_id: model.display_id,
            client_id: model.client_id,
            client_name: model.client_name,
            client_email: model.client_email,
            client_phone: model.client_phone,
            notifications_enabled: model.notifications_enabled,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NotificationsRequest {
    /// Explicit value; omit to flip the current setting
    pub enabled: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments",
    request_body = NewShipment,
    responses(
        (status = 200, description = "Shipment registered", body = ApiResponse<ShipmentSummary>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Display id already taken", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "shipments"
)]
pub async fn create_shipment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewShipment>,
) -> ApiResult<ShipmentSummary> {
    let created = state
        .shipments()
        .create_shipment(user.user_id, payload)
        .await?;
    Ok(Json(ApiResponse::success(ShipmentSummary::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments",
    responses(
        (status = 200, description = "Shipments listed", body = ApiResponse<Vec<ShipmentSummary>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "shipments"
)]
pub async fn list_shipments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<ShipmentSummary>> {
    let records = state.shipments().list_shipments(user.user_id).await?;
    let items: Vec<ShipmentSummary> = records.into_iter().map(ShipmentSummary::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments/{id}",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Shipment fetched", body = ApiResponse<ShipmentSummary>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "shipments"
)]
pub async fn get_shipment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<ShipmentSummary> {
    let record = state.shipments().get_shipment(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(ShipmentSummary::from(record))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/shipments/{id}",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Shipment deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "shipments"
)]
pub async fn delete_shipment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.shipments().delete_shipment(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments/{id}/notifications",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    request_body = NotificationsRequest,
    responses(
        (status = 200, description = "Notification flag updated", body = ApiResponse<ShipmentSummary>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "shipments"
)]
pub async fn set_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    payload: Option<Json<NotificationsRequest>>,
) -> ApiResult<ShipmentSummary> {
    let enabled = payload.and_then(|Json(body)| body.enabled);
    let updated = state
        .shipments()
        .set_notifications(user.user_id, id, enabled)
        .await?;
    Ok(Json(ApiResponse::success(ShipmentSummary::from(updated))))
}
