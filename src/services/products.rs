//! Product catalog: public reads, owner-scoped writes.

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{product, TextList};
use crate::errors::ServiceError;

/// Input for adding a catalog product.
#[derive(Clone, Debug, Deserialize, Validate, ToSchema)]
pub struct NewProduct {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    #[schema(example = "EN 590 Diesel")]
    pub title: String,
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: String,
    #[validate(length(min = 1, max = 64, message = "Category is required"))]
    #[schema(example = "petroleum")]
    pub category: String,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
    #[serde(default)]
    pub specifications: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Clone)]
pub struct ProductService {
    db: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_product(
        &self,
        owner: Uuid,
        input: NewProduct,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let record = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner),
            title: Set(input.title.trim().to_string()),
            description: Set(input.description.trim().to_string()),
            category: Set(input.category.trim().to_lowercase()),
            image_url: Set(input
                .image_url
                .as_deref()
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())),
            specifications: Set(TextList(input.specifications)),
            certifications: Set(TextList(input.certifications)),
            ..Default::default()
        };

        let created = record.insert(self.db.as_ref()).await?;
        info!(product_id = %created.id, "product created");
        Ok(created)
    }

    /// Public catalog listing, optionally filtered by category.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<product::Model>, ServiceError> {
        let mut query = product::Entity::find().order_by_asc(product::Column::Title);
        if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
            query = query.filter(product::Column::Category.eq(category.to_lowercase()));
        }
        let products = query.all(self.db.as_ref()).await?;
        Ok(products)
    }

    /// Public single-product read.
    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: Uuid) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(product_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
    }

    /// Deletes a product owned by the caller. Other users' rows look absent.
    #[instrument(skip(self))]
    pub async fn delete_product(
        &self,
        owner: Uuid,
        product_id: Uuid,
    ) -> Result<(), ServiceError> {
        let record = product::Entity::find_by_id(product_id)
            .filter(product::Column::UserId.eq(owner))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        record.delete(self.db.as_ref()).await?;
        info!(%product_id, "product deleted");
        Ok(())
    }
}
