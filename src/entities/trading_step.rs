use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::TextList;

/// Status of a trading step.
///
/// `Delayed` is a manual overlay set by an operator edit; it is never entered
/// or left by the automatic action-count rule.
#[derive(
    Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[sea_orm(string_value = "upcoming")]
    Upcoming,
    #[sea_orm(string_value = "current")]
    Current,
    #[sea_orm(string_value = "partially_completed")]
    PartiallyCompleted,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "delayed")]
    Delayed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepStatus::Upcoming => "upcoming",
            StepStatus::Current => "current",
            StepStatus::PartiallyCompleted => "partially_completed",
            StepStatus::Completed => "completed",
            StepStatus::Delayed => "delayed",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "upcoming" => Ok(StepStatus::Upcoming),
            "current" => Ok(StepStatus::Current),
            "partially_completed" => Ok(StepStatus::PartiallyCompleted),
            "completed" => Ok(StepStatus::Completed),
            "delayed" => Ok(StepStatus::Delayed),
            other => Err(format!("unknown step status: {}", other)),
        }
    }
}

/// Trading step record
///
/// One row per (shipment, step number); titles, descriptions, and default
/// actions live in the static template catalog, not here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "trading_steps")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning shipment
    pub shipment_id: Uuid,

    /// Template step number (1-based, unique per shipment)
    pub step_number: i32,

    /// Current status
    pub status: StepStatus,

    /// Action labels that must be completed for this step
    #[sea_orm(column_type = "Json")]
    pub required_actions: TextList,

    /// Subset of required actions already completed
    #[sea_orm(column_type = "Json")]
    pub completed_actions: TextList,

    /// Free-text operator notes
    #[validate(length(max = 2000, message = "Notes cannot exceed 2000 characters"))]
    pub notes: Option<String>,

    /// Estimated completion date, if set
    pub estimated_completion: Option<Date>,

    /// When this step was instantiated for the shipment
    pub started_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// True when every required action has been completed.
    pub fn all_actions_completed(&self) -> bool {
        self.completed_actions.len() == self.required_actions.len()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shipment::Entity",
        from = "Column::ShipmentId",
        to = "super::shipment::Column::Id"
    )]
    Shipment,
}

impl Related<super::shipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shipment.def()
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
            active_model.started_at = Set(Utc::now());
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            StepStatus::Upcoming,
            StepStatus::Current,
            StepStatus::PartiallyCompleted,
            StepStatus::Completed,
            StepStatus::Delayed,
        ] {
            let parsed: StepStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("stalled".parse::<StepStatus>().is_err());
    }
}
