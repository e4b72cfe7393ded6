use crate::{
    auth::AuthUser, entities::product, services::products::NewProduct, ApiResponse, ApiResult,
    AppState,
};
use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Filter by category (petroleum, coal, minerals, foodstuffs, ...)
    pub category: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    #[schema(example = "EN 590 Diesel")]
    pub title: String,
    pub description: String,
    #[schema(example = "petroleum")]
    pub category: String,
    pub image_url: Option<String>,
    pub specifications: Vec<String>,
    pub certifications: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product::Model> for ProductSummary {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            category: model.category,
            image_url: model.image_url,
            specifications: model.specifications.0,
            certifications: model.certifications.0,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Products listed", body = ApiResponse<Vec<ProductSummary>>)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<Vec<ProductSummary>> {
    let records = state
        .products()
        .list_products(query.category.as_deref())
        .await?;
    let items: Vec<ProductSummary> = records.into_iter().map(ProductSummary::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product fetched", body = ApiResponse<ProductSummary>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ProductSummary> {
    let record = state.products().get_product(id).await?;
    Ok(Json(ApiResponse::success(ProductSummary::from(record))))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = NewProduct,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<ProductSummary>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewProduct>,
) -> ApiResult<ProductSummary> {
    let created = state
        .products()
        .create_product(user.user_id, payload)
        .await?;
    Ok(Json(ApiResponse::success(ProductSummary::from(created))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.products().delete_product(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}
