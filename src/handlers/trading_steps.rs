use crate::{
    auth::AuthUser,
    entities::trading_step::{self, StepStatus},
    services::trading_steps::StepEdit,
    steps::{StepTemplate, STEP_TEMPLATES},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

/// A step record joined against its template.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "step_number": 1,
    "title": "Initial Inquiry",
    "description": "Client submits product requirements and specifications",
    "icon": "message-square",
    "status": "current",
    "required_actions": ["Submit RFQ form", "Provide product specifications"],
    "completed_actions": [],
    "notes": null,
    "estimated_completion": null,
    "started_at": "2026-03-01T10:30:00Z",
    "updated_at": "2026-03-01T10:30:00Z"
}))]
pub struct StepDetail {
    /// Template step number (1-based)
    pub step_number: i32,
    #[schema(example = "Initial Inquiry")]
    pub title: String,
    pub description: String,
    /// Opaque icon tag for the presentation layer
    #[schema(example = "message-square")]
    pub icon: String,
    /// upcoming | current | partially_completed | completed | delayed
    pub status: StepStatus,
    pub required_actions: Vec<String>,
    pub completed_actions: Vec<String>,
    pub notes: Option<String>,
    pub estimated_completion: Option<NaiveDate>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<trading_step::Model> for StepDetail {
    fn from(model: trading_step::Model) -> Self {
        let template = crate::steps::template(model.step_number);
        Self {
            step_number: model.step_number,
            title: template.map(|t| t.title).unwrap_or_default().to_string(),
            description: template
                .map(|t| t.description)
                .unwrap_or_default()
                .to_string(),
            icon: template.map(|t| t.icon).unwrap_or_default().to_string(),
            status: model.status,
            required_actions: model.required_actions.0,
            completed_actions: model.completed_actions.0,
            notes: model.notes,
            estimated_completion: model.estimated_completion,
            started_at: model.started_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AddStepRequest {
    /// Template step number; omit to append the next one
    pub step_number: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleActionRequest {
    /// One of the step's required action labels
    #[schema(example = "Submit RFQ form")]
    pub action: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/process/steps",
    responses(
        (status = 200, description = "Static step template catalog", body = ApiResponse<Vec<StepTemplate>>)
    ),
    tag = "process"
)]
pub async fn list_step_templates() -> ApiResult<Vec<StepTemplate>> {
    Ok(Json(ApiResponse::success(STEP_TEMPLATES.to_vec())))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments/{id}/steps",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Ordered step records", body = ApiResponse<Vec<StepDetail>>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "trading-steps"
)]
pub async fn list_steps(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<StepDetail>> {
    let records = state.trading().list_steps(user.user_id, id).await?;
    let items: Vec<StepDetail> = records.into_iter().map(StepDetail::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments/{id}/steps",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    request_body = AddStepRequest,
    responses(
        (status = 200, description = "Step added", body = ApiResponse<StepDetail>),
        (status = 400, description = "Previous step not completed or unknown template", body = crate::errors::ErrorResponse),
        (status = 409, description = "Step already exists", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "trading-steps"
)]
pub async fn add_step(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    payload: Option<Json<AddStepRequest>>,
) -> ApiResult<StepDetail> {
    let requested = payload.and_then(|Json(body)| body.step_number);
    let created = state.trading().add_step(user.user_id, id, requested).await?;
    Ok(Json(ApiResponse::success(StepDetail::from(created))))
}

#[utoipa::path(
    put,
    path = "/api/v1/shipments/{id}/steps/{step_number}",
    params(
        ("id" = Uuid, Path, description = "Shipment ID"),
        ("step_number" = i32, Path, description = "Template step number")
    ),
    request_body = StepEdit,
    responses(
        (status = 200, description = "Step updated", body = ApiResponse<StepDetail>),
        (status = 404, description = "Shipment or step not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "trading-steps"
)]
pub async fn update_step(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, step_number)): Path<(Uuid, i32)>,
    Json(payload): Json<StepEdit>,
) -> ApiResult<StepDetail> {
    let updated = state
        .trading()
        .update_step(user.user_id, id, step_number, payload)
        .await?;
    Ok(Json(ApiResponse::success(StepDetail::from(updated))))
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments/{id}/steps/{step_number}/actions",
    params(
        ("id" = Uuid, Path, description = "Shipment ID"),
        ("step_number" = i32, Path, description = "Template step number")
    ),
    request_body = ToggleActionRequest,
    responses(
        (status = 200, description = "Action toggled", body = ApiResponse<StepDetail>),
        (status = 400, description = "Unknown action label", body = crate::errors::ErrorResponse),
        (status = 404, description = "Shipment or step not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "trading-steps"
)]
pub async fn toggle_action(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, step_number)): Path<(Uuid, i32)>,
    Json(payload): Json<ToggleActionRequest>,
) -> ApiResult<StepDetail> {
    let updated = state
        .trading()
        .toggle_action(user.user_id, id, step_number, &payload.action)
        .await?;
    Ok(Json(ApiResponse::success(StepDetail::from(updated))))
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments/{id}/steps/{step_number}/complete",
    params(
        ("id" = Uuid, Path, description = "Shipment ID"),
        ("step_number" = i32, Path, description = "Template step number")
    ),
    responses(
        (status = 200, description = "Step completed", body = ApiResponse<StepDetail>),
        (status = 404, description = "Shipment or step not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "trading-steps"
)]
pub async fn complete_step(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, step_number)): Path<(Uuid, i32)>,
) -> ApiResult<StepDetail> {
    let updated = state
        .trading()
        .complete_step(user.user_id, id, step_number)
        .await?;
    Ok(Json(ApiResponse::success(StepDetail::from(updated))))
}
