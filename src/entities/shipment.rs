use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Shipment entity
///
/// One row per client shipment, owned by the back-office user who registered
/// it. The human-readable display id is what anonymous visitors type into the
/// tracking widget.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "shipments")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Human-readable shipment identifier (e.g., "SHP-001"), unique
    #[validate(length(
        min = 1,
        max = 64,
        message = "Display id must be between 1 and 64 characters"
    ))]
    pub display_id: String,

    /// Owning back-office user
    pub user_id: Uuid,

    /// Client reference supplied by the operator
    #[validate(length(min = 1, max = 64, message = "Client id is required"))]
    pub client_id: String,

    /// Client company or contact name
    #[validate(length(min = 1, max = 255, message = "Client name is required"))]
    pub client_name: String,

    /// Client contact email
    #[validate(email(message = "Client email must be a valid email address"))]
    pub client_email: String,

    /// Optional client phone number
    pub client_phone: Option<String>,

    /// Whether progress notifications are enabled for this shipment
    pub notifications_enabled: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trading_step::Entity")]
    TradingSteps,
}

impl Related<super::trading_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TradingSteps.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.notifications_enabled {
                active_model.notifications_enabled = Set(true);
            }
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
