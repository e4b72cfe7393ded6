//! Shipment registry: owner-scoped CRUD plus the anonymous tracking lookup.

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{shipment, trading_step};
use crate::errors::ServiceError;

/// Input for registering a shipment.
#[derive(Clone, Debug, Deserialize, Validate, ToSchema)]
pub struct NewShipment {
    /// Human-readable identifier the client will use for tracking
    #[validate(length(
        min = 1,
        max = 64,
        message = "Display id must be between 1 and 64 characters"
    ))]
    #[schema(example = "SHP-001")]
    pub display_id: String,
    #[validate(length(min = 1, max = 64, message = "Client id is required"))]
    #[schema(example = "CL-ACME")]
    pub client_id: String,
    #[validate(length(min = 1, max = 255, message = "Client name is required"))]
    #[schema(example = "Acme Co")]
    pub client_name: String,
    #[validate(email(message = "Client email must be a valid email address"))]
    #[schema(example = "logistics@acme.example")]
    pub client_email: String,
    pub client_phone: Option<String>,
    /// Defaults to true when omitted
    pub notifications_enabled: Option<bool>,
}

#[derive(Clone)]
pub struct ShipmentService {
    db: Arc<DbPool>,
}

impl ShipmentService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Registers a shipment. The display id must be globally unique so that
    /// anonymous tracking lookups are unambiguous.
    #[instrument(skip(self, input), fields(display_id = %input.display_id))]
    pub async fn create_shipment(
        &self,
        owner: Uuid,
        input: NewShipment,
    ) -> Result<shipment::Model, ServiceError> {
        input.validate()?;

        let display_id = input.display_id.trim().to_string();
        let existing = shipment::Entity::find()
            .filter(shipment::Column::DisplayId.eq(display_id.clone()))
            .one(self.db.as_ref())
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Shipment {} already exists",
                display_id
            )));
        }

        let record = shipment::ActiveModel {
            id: Set(Uuid::new_v4()),
            display_id: Set(display_id),
            user_id: Set(owner),
            client_id: Set(input.client_id.trim().to_string()),
            client_name: Set(input.client_name.trim().to_string()),
            client_email: Set(input.client_email.trim().to_string()),
            client_phone: Set(input
                .client_phone
                .as_deref()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())),
            notifications_enabled: match input.notifications_enabled {
                Some(flag) => Set(flag),
                None => sea_orm::ActiveValue::NotSet,
            },
            ..Default::default()
        };

        let created = record.insert(self.db.as_ref()).await?;
        info!(shipment_id = %created.id, "shipment registered");
        Ok(created)
    }

    /// Lists the caller's shipments, newest first.
    #[instrument(skip(self))]
    pub async fn list_shipments(&self, owner: Uuid) -> Result<Vec<shipment::Model>, ServiceError> {
        let shipments = shipment::Entity::find()
            .filter(shipment::Column::UserId.eq(owner))
            .order_by_desc(shipment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(shipments)
    }

    /// Fetches one shipment owned by the caller. Rows owned by other users
    /// are reported as not found rather than forbidden.
    #[instrument(skip(self))]
    pub async fn get_shipment(
        &self,
        owner: Uuid,
        shipment_id: Uuid,
    ) -> Result<shipment::Model, ServiceError> {
        shipment::Entity::find_by_id(shipment_id)
            .filter(shipment::Column::UserId.eq(owner))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Shipment {} not found", shipment_id)))
    }

    /// Sets the notification flag, or flips it when no explicit value is
    /// supplied.
    #[instrument(skip(self))]
    pub async fn set_notifications(
        &self,
        owner: Uuid,
        shipment_id: Uuid,
        enabled: Option<bool>,
    ) -> Result<shipment::Model, ServiceError> {
        let record = self.get_shipment(owner, shipment_id).await?;
        let target = enabled.unwrap_or(!record.notifications_enabled);
        let mut active = record.into_active_model();
        active.notifications_enabled = Set(target);
        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated)
    }

    /// Deletes a shipment and its step records in one transaction.
    #[instrument(skip(self))]
    pub async fn delete_shipment(
        &self,
        owner: Uuid,
        shipment_id: Uuid,
    ) -> Result<(), ServiceError> {
        let record = self.get_shipment(owner, shipment_id).await?;

        let txn = self.db.begin().await?;
        trading_step::Entity::delete_many()
            .filter(trading_step::Column::ShipmentId.eq(shipment_id))
            .exec(&txn)
            .await?;
        record.delete(&txn).await?;
        txn.commit().await?;

        info!(%shipment_id, "shipment deleted");
        Ok(())
    }

    /// Anonymous tracking lookup. The display id must match exactly; the
    /// client name is compared case-insensitively after trimming. Misses
    /// return a single not-found message so the endpoint does not reveal
    /// which half of the pair was wrong.
    #[instrument(skip(self, client_name))]
    pub async fn find_for_tracking(
        &self,
        display_id: &str,
        client_name: &str,
    ) -> Result<shipment::Model, ServiceError> {
        let miss = || {
            ServiceError::NotFound("No shipment found with the provided details".to_string())
        };

        let record = shipment::Entity::find()
            .filter(shipment::Column::DisplayId.eq(display_id.trim()))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(miss)?;

        if !record
            .client_name
            .trim()
            .eq_ignore_ascii_case(client_name.trim())
        {
            return Err(miss());
        }

        Ok(record)
    }
}
