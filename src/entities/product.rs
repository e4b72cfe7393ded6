use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::TextList;

/// Catalog product entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning back-office user
    pub user_id: Uuid,

    /// Product title
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,

    /// Product description
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: String,

    /// Product category (e.g., petroleum, coal, minerals, foodstuffs)
    #[validate(length(min = 1, max = 64, message = "Category is required"))]
    pub category: String,

    /// URL to the product image
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    /// Specification bullet points
    #[sea_orm(column_type = "Json")]
    pub specifications: TextList,

    /// Certification labels
    #[sea_orm(column_type = "Json")]
    pub certifications: TextList,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            active_model.created_at = Set(Utc::now());
        }

        active_model.updated_at = Set(Utc::now());

        let model: Model = active_model.clone().try_into().map_err(|_| {
            DbErr::Custom("Failed to convert ActiveModel to Model for validation".to_string())
        })?;

        if let Err(err) = model.validate() {
            return Err(DbErr::Custom(format!("Validation error: {}", err)));
        }

        Ok(active_model)
    }
}
