use crate::{
    entities::trading_step::StepStatus, handlers::trading_steps::StepDetail, ApiResponse,
    ApiResult, AppState,
};
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TrackRequest {
    /// Human-readable shipment identifier
    #[validate(length(min = 1, message = "Shipment id is required"))]
    #[schema(example = "SHP-001")]
    pub shipment_id: String,
    /// Client name as registered on the shipment
    #[validate(length(min = 1, message = "Client name is required"))]
    #[schema(example = "Acme Co")]
    pub client_name: String,
    /// Optional status filter; "all" or omitted returns every step
    #[schema(example = "completed")]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackedShipment {
    #[schema(example = "SHP-001")]
    pub display_id: String,
    #[schema(example = "Acme Co")]
    pub client_name: String,
    pub notifications_enabled: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackingView {
    pub shipment: TrackedShipment,
    pub steps: Vec<StepDetail>,
}

#[utoipa::path(
    post,
    path = "/api/v1/track",
    request_body = TrackRequest,
    responses(
        (status = 200, description = "Shipment found", body = ApiResponse<TrackingView>),
        (status = 404, description = "No shipment matches the provided details", body = crate::errors::ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn track_shipment(
    State(state): State<AppState>,
    Json(payload): Json<TrackRequest>,
) -> ApiResult<TrackingView> {
    payload
        .validate()
        .map_err(crate::errors::ServiceError::from)?;

    let shipment = state
        .shipments()
        .find_for_tracking(&payload.shipment_id, &payload.client_name)
        .await?;

    let filter: Option<StepStatus> = match payload.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(raw.parse().map_err(crate::errors::ServiceError::InvalidInput)?),
    };

    let records = state.trading().steps_for(shipment.id).await?;
    let steps: Vec<StepDetail> = records
        .into_iter()
        .filter(|s| filter.as_ref().map(|f| &s.status == f).unwrap_or(true))
        .map(StepDetail::from)
        .collect();

    Ok(Json(ApiResponse::success(TrackingView {
        shipment: TrackedShipment {
            display_id: shipment.display_id,
            client_name: shipment.client_name,
            notifications_enabled: shipment.notifications_enabled,
        },
        steps,
    })))
}
