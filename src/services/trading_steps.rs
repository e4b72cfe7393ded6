//! Trading-step state machine.
//!
//! Step records live in `trading_steps`, one row per (shipment, step number).
//! Titles and default actions come from the static template catalog. Status
//! follows the action counts except for `delayed`, which is a manual overlay
//! that only an explicit edit enters or leaves.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseTransaction, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{shipment, trading_step, TextList};
use crate::entities::trading_step::StepStatus;
use crate::errors::ServiceError;
use crate::steps;

/// Manual edit payload. Absent fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct StepEdit {
    /// Explicit status override; the only way in or out of `delayed`
    pub status: Option<StepStatus>,
    /// Replacement required-action list; completed actions not in the new
    /// list are dropped
    pub required_actions: Option<Vec<String>>,
    pub notes: Option<String>,
    pub estimated_completion: Option<NaiveDate>,
}

/// Status implied by the action counts.
///
/// Completion is checked first so a step with no required actions counts as
/// complete. A step with some actions done but not all is partially
/// completed; an untouched step stays current rather than dropping back to
/// upcoming.
pub fn derive_status(required: usize, completed: usize) -> StepStatus {
    if completed == required {
        StepStatus::Completed
    } else if completed == 0 {
        StepStatus::Current
    } else {
        StepStatus::PartiallyCompleted
    }
}

#[derive(Clone)]
pub struct TradingStepService {
    db: Arc<DbPool>,
}

impl TradingStepService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    async fn owned_shipment(
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

    async fn find_step(
        &self,
        shipment_id: Uuid,
        step_number: i32,
    ) -> Result<trading_step::Model, ServiceError> {
        trading_step::Entity::find()
            .filter(trading_step::Column::ShipmentId.eq(shipment_id))
            .filter(trading_step::Column::StepNumber.eq(step_number))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Step {} not found for this shipment",
                    step_number
                ))
            })
    }

    /// Ordered step records for one of the caller's shipments.
    #[instrument(skip(self))]
    pub async fn list_steps(
        &self,
        owner: Uuid,
        shipment_id: Uuid,
    ) -> Result<Vec<trading_step::Model>, ServiceError> {
        self.owned_shipment(owner, shipment_id).await?;
        self.steps_for(shipment_id).await
    }

    /// Ordered step records without an ownership check, for the anonymous
    /// tracking read. Callers must have resolved the shipment already.
    pub async fn steps_for(
        &self,
        shipment_id: Uuid,
    ) -> Result<Vec<trading_step::Model>, ServiceError> {
        let records = trading_step::Entity::find()
            .filter(trading_step::Column::ShipmentId.eq(shipment_id))
            .order_by_asc(trading_step::Column::StepNumber)
            .all(self.db.as_ref())
            .await?;
        Ok(records)
    }

    /// Instantiates the next template step for a shipment.
    ///
    /// When `requested` is omitted the step after the latest existing record
    /// is used (step 1 for a fresh shipment). The previous step must be
    /// completed, the number must name a known template, the record must not
    /// already exist, and steps cannot be added out of order.
    #[instrument(skip(self))]
    pub async fn add_step(
        &self,
        owner: Uuid,
        shipment_id: Uuid,
        requested: Option<i32>,
    ) -> Result<trading_step::Model, ServiceError> {
        self.owned_shipment(owner, shipment_id).await?;

        let existing = self.steps_for(shipment_id).await?;
        let next_number = existing.last().map(|s| s.step_number + 1).unwrap_or(1);

        let number = requested.unwrap_or(next_number);
        if number != next_number {
            if existing.iter().any(|s| s.step_number == number) {
                return Err(ServiceError::Conflict(format!(
                    "Step {} already exists for this shipment",
                    number
                )));
            }
            return Err(ServiceError::InvalidOperation(
                "Steps must be added in order".to_string(),
            ));
        }

        let template = steps::template(number).ok_or_else(|| {
            ServiceError::InvalidInput(format!("Unknown process step: {}", number))
        })?;

        if let Some(latest) = existing.last() {
            if latest.status != StepStatus::Completed {
                return Err(ServiceError::InvalidOperation(
                    "Complete the current step before adding the next one".to_string(),
                ));
            }
        }

        let record = Self::step_from_template(shipment_id, template)
            .insert(self.db.as_ref())
            .await?;
        info!(%shipment_id, step_number = number, "step added");
        Ok(record)
    }

    /// Toggles one required action on or off and recomputes the status.
    ///
    /// Completing the final action advances the process: the next template
    /// step is instantiated as current if it does not exist yet. A delayed
    /// step records the toggle but stays delayed.
    #[instrument(skip(self, action))]
    pub async fn toggle_action(
        &self,
        owner: Uuid,
        shipment_id: Uuid,
        step_number: i32,
        action: &str,
    ) -> Result<trading_step::Model, ServiceError> {
        self.owned_shipment(owner, shipment_id).await?;
        let step = self.find_step(shipment_id, step_number).await?;

        if !step.required_actions.contains(action) {
            return Err(ServiceError::InvalidInput(format!(
                "Unknown action: {}",
                action
            )));
        }

        let mut completed = step.completed_actions.0.clone();
        if let Some(pos) = completed.iter().position(|a| a == action) {
            completed.remove(pos);
        } else {
            completed.push(action.to_string());
        }

        let was_completed = step.status == StepStatus::Completed;
        let status = if step.status == StepStatus::Delayed {
            StepStatus::Delayed
        } else {
            derive_status(step.required_actions.len(), completed.len())
        };
        let now_completed = status == StepStatus::Completed;

        let txn = self.db.begin().await?;
        let mut active = step.into_active_model();
        active.completed_actions = Set(TextList(completed));
        active.status = Set(status);
        let updated = active.update(&txn).await?;

        if now_completed && !was_completed {
            self.advance(&txn, shipment_id, step_number).await?;
        }
        txn.commit().await?;

        Ok(updated)
    }

    /// Marks every required action done and the step completed, advancing
    /// the process the same way the final toggle would.
    #[instrument(skip(self))]
    pub async fn complete_step(
        &self,
        owner: Uuid,
        shipment_id: Uuid,
        step_number: i32,
    ) -> Result<trading_step::Model, ServiceError> {
        self.owned_shipment(owner, shipment_id).await?;
        let step = self.find_step(shipment_id, step_number).await?;

        let was_completed = step.status == StepStatus::Completed;
        let required = step.required_actions.clone();

        let txn = self.db.begin().await?;
        let mut active = step.into_active_model();
        active.completed_actions = Set(required);
        active.status = Set(StepStatus::Completed);
        let updated = active.update(&txn).await?;

        if !was_completed {
            self.advance(&txn, shipment_id, step_number).await?;
        }
        txn.commit().await?;

        info!(%shipment_id, step_number, "step force-completed");
        Ok(updated)
    }

    /// Applies a manual edit.
    ///
    /// An explicit status wins over the derived one and is the only way in
    /// or out of `delayed`. Replacing the required-action list drops
    /// completed actions that no longer exist. Manual edits never
    /// auto-advance the process.
    #[instrument(skip(self, edit))]
    pub async fn update_step(
        &self,
        owner: Uuid,
        shipment_id: Uuid,
        step_number: i32,
        edit: StepEdit,
    ) -> Result<trading_step::Model, ServiceError> {
        self.owned_shipment(owner, shipment_id).await?;
        let step = self.find_step(shipment_id, step_number).await?;

        let required = edit
            .required_actions
            .clone()
            .map(TextList::from)
            .unwrap_or_else(|| step.required_actions.clone());
        let completed: Vec<String> = step
            .completed_actions
            .0
            .iter()
            .filter(|a| required.contains(a))
            .cloned()
            .collect();

        let status = match edit.status {
            Some(explicit) => explicit,
            None if step.status == StepStatus::Delayed => StepStatus::Delayed,
            None => derive_status(required.len(), completed.len()),
        };

        let mut active = step.into_active_model();
        active.required_actions = Set(required);
        active.completed_actions = Set(TextList(completed));
        active.status = Set(status);
        if let Some(notes) = edit.notes {
            active.notes = Set(Some(notes).filter(|n| !n.trim().is_empty()));
        }
        if let Some(date) = edit.estimated_completion {
            active.estimated_completion = Set(Some(date));
        }

        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated)
    }

    fn step_from_template(
        shipment_id: Uuid,
        template: &steps::StepTemplate,
    ) -> trading_step::ActiveModel {
        trading_step::ActiveModel {
            id: Set(Uuid::new_v4()),
            shipment_id: Set(shipment_id),
            step_number: Set(template.number),
            status: Set(StepStatus::Current),
            required_actions: Set(TextList::from(template.default_actions)),
            completed_actions: Set(TextList::default()),
            notes: Set(None),
            estimated_completion: Set(None),
            ..Default::default()
        }
    }

    async fn advance(
        &self,
        txn: &DatabaseTransaction,
        shipment_id: Uuid,
        completed_number: i32,
    ) -> Result<(), ServiceError> {
        let Some(next) = steps::next_template(completed_number) else {
            return Ok(());
        };

        let exists = trading_step::Entity::find()
            .filter(trading_step::Column::ShipmentId.eq(shipment_id))
            .filter(trading_step::Column::StepNumber.eq(next.number))
            .one(txn)
            .await?
            .is_some();
        if exists {
            return Ok(());
        }

        Self::step_from_template(shipment_id, next).insert(txn).await?;
        info!(%shipment_id, step_number = next.number, "next step opened");
        Ok(())
    }
}
