use crate::{
    services::rfq::{RfqForm, RfqService, LAST_INPUT_STEP},
    ApiResponse, ApiResult, AppState,
};
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

fn default_validate_step() -> u8 {
    LAST_INPUT_STEP
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateRfqRequest {
    #[serde(flatten)]
    pub form: RfqForm,
    /// 1-based form step the visitor has reached; defaults to the last one
    #[serde(default = "default_validate_step")]
    #[schema(example = 2)]
    pub step: u8,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "valid": false,
    "errors": { "quantity": "Quantity is required" }
}))]
pub struct ValidationOutcome {
    pub valid: bool,
    /// Field-keyed error messages; empty when valid
    pub errors: BTreeMap<String, String>,
}

impl ValidationOutcome {
    fn from_errors(errors: crate::services::rfq::FieldErrors) -> Self {
        Self {
            valid: errors.is_empty(),
            errors: errors
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RfqReceipt {
    /// Identifier of the stored submission
    pub submission_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/v1/rfq/validate",
    request_body = ValidateRfqRequest,
    responses(
        (status = 200, description = "Validation outcome for the draft", body = ApiResponse<ValidationOutcome>)
    ),
    tag = "rfq"
)]
pub async fn validate_rfq(
    Json(payload): Json<ValidateRfqRequest>,
) -> ApiResult<ValidationOutcome> {
    let errors = RfqService::validate_form(&payload.form, payload.step);
    Ok(Json(ApiResponse::success(ValidationOutcome::from_errors(
        errors,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/rfq",
    request_body = RfqForm,
    responses(
        (status = 200, description = "Submission stored", body = ApiResponse<RfqReceipt>),
        (status = 400, description = "Form failed validation", body = ApiResponse<ValidationOutcome>)
    ),
    tag = "rfq"
)]
pub async fn submit_rfq(
    State(state): State<AppState>,
    Json(form): Json<RfqForm>,
) -> Result<Json<ApiResponse<RfqReceipt>>, axum::response::Response> {
    use axum::response::IntoResponse;

    let errors = RfqService::validate_form(&form, LAST_INPUT_STEP);
    if !errors.is_empty() {
        let outcome = ValidationOutcome::from_errors(errors);
        let body = ApiResponse {
            success: false,
            data: Some(outcome),
            message: Some("Validation failed".to_string()),
            errors: None,
            meta: Some(crate::ResponseMeta::capture()),
        };
        return Err((axum::http::StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    let stored = state
        .rfq()
        .submit(form)
        .await
        .map_err(|e| e.into_response())?;

    Ok(Json(ApiResponse::success(RfqReceipt {
        submission_id: stored.id,
    })))
}
