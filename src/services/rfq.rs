//! RFQ form validation and submission.
//!
//! Validation is a pure function over the draft form and the step the visitor
//! has reached; the multi-step form only validates fields the visitor has
//! seen. Submission re-validates at the last input step and persists.

use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::rfq_submission;
use crate::errors::ServiceError;

/// The last step of the form that collects input; review happens after.
pub const LAST_INPUT_STEP: u8 = 4;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

fn default_unit() -> String {
    "MT".to_string()
}

/// RFQ form contents, as drafted by the visitor.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RfqForm {
    #[schema(example = "Jane Smith")]
    pub full_name: String,
    #[schema(example = "jane@acme.example")]
    pub email: String,
    #[schema(example = "Acme Trading Co")]
    pub company: String,
    pub phone: Option<String>,
    #[schema(example = "petroleum")]
    pub product_category: String,
    #[schema(example = "EN 590 10ppm diesel")]
    pub product_specifications: String,
    #[schema(example = "50000")]
    pub quantity: String,
    /// Quantity unit; defaults to metric tonnes.
    #[serde(default = "default_unit")]
    #[schema(example = "MT")]
    pub unit: String,
    #[schema(example = "CIF")]
    pub incoterm: String,
    pub additional_info: Option<String>,
}

/// Field-keyed validation error map. Ordered for stable response bodies.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

#[derive(Clone)]
pub struct RfqService {
    db: Arc<DbPool>,
}

impl RfqService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Validates the form as seen from `step` (1-based). Fields belonging to
    /// later steps are not checked. Contact fields are always checked.
    pub fn validate_form(form: &RfqForm, step: u8) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if form.full_name.trim().is_empty() {
            errors.insert("full_name", "Full name is required");
        }
        if !EMAIL_RE.is_match(form.email.trim()) {
            errors.insert("email", "Please enter a valid email address");
        }
        if form.company.trim().is_empty() {
            errors.insert("company", "Company name is required");
        }

        if step >= 1 && form.product_category.trim().is_empty() {
            errors.insert("product_category", "Please select a product category");
        }
        if step >= 2 && form.product_specifications.trim().is_empty() {
            errors.insert(
                "product_specifications",
                "Product specifications are required",
            );
        }
        if step >= 3 && form.quantity.trim().is_empty() {
            errors.insert("quantity", "Quantity is required");
        }
        if step >= 4 && form.incoterm.trim().is_empty() {
            errors.insert("incoterm", "Please select an incoterm");
        }

        errors
    }

    /// Validates at the last input step and persists the submission.
    #[instrument(skip(self, form), fields(company = %form.company))]
    pub async fn submit(&self, form: RfqForm) -> Result<rfq_submission::Model, ServiceError> {
        let errors = Self::validate_form(&form, LAST_INPUT_STEP);
        if !errors.is_empty() {
            let joined = errors
                .values()
                .copied()
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ServiceError::ValidationError(joined));
        }

        let unit = if form.unit.trim().is_empty() {
            default_unit()
        } else {
            form.unit.trim().to_string()
        };

        let record = rfq_submission::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(form.full_name.trim().to_string()),
            email: Set(form.email.trim().to_string()),
            company: Set(form.company.trim().to_string()),
            phone: Set(form.phone.as_deref().map(|p| p.trim().to_string())),
            product_category: Set(form.product_category.trim().to_string()),
            product_specifications: Set(form.product_specifications.trim().to_string()),
            quantity: Set(form.quantity.trim().to_string()),
            unit: Set(unit),
            incoterm: Set(form.incoterm.trim().to_string()),
            additional_info: Set(form
                .additional_info
                .as_deref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())),
            ..Default::default()
        };

        let inserted = record.insert(self.db.as_ref()).await?;

        info!(submission_id = %inserted.id, "rfq submission stored");
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> RfqForm {
        RfqForm {
            full_name: "Jane Smith".into(),
            email: "jane@acme.example".into(),
            company: "Acme Trading Co".into(),
            phone: None,
            product_category: "petroleum".into(),
            product_specifications: "EN 590 10ppm diesel".into(),
            quantity: "50000".into(),
            unit: "MT".into(),
            incoterm: "CIF".into(),
            additional_info: None,
        }
    }

    #[test]
    fn contact_fields_are_always_required() {
        let form = RfqForm::default();
        let errors = RfqService::validate_form(&form, 1);
        assert_eq!(errors.get("full_name"), Some(&"Full name is required"));
        assert_eq!(
            errors.get("email"),
            Some(&"Please enter a valid email address")
        );
        assert_eq!(errors.get("company"), Some(&"Company name is required"));
    }

    #[test]
    fn later_step_fields_are_not_checked_early() {
        let mut form = complete_form();
        form.product_specifications.clear();
        form.quantity.clear();
        form.incoterm.clear();

        let at_step_1 = RfqService::validate_form(&form, 1);
        assert!(at_step_1.is_empty());

        let at_step_2 = RfqService::validate_form(&form, 2);
        assert_eq!(
            at_step_2.get("product_specifications"),
            Some(&"Product specifications are required")
        );
        assert!(!at_step_2.contains_key("quantity"));
        assert!(!at_step_2.contains_key("incoterm"));

        let at_step_3 = RfqService::validate_form(&form, 3);
        assert!(at_step_3.contains_key("quantity"));
        assert!(!at_step_3.contains_key("incoterm"));

        let at_step_4 = RfqService::validate_form(&form, 4);
        assert_eq!(at_step_4.get("incoterm"), Some(&"Please select an incoterm"));
    }

    #[test]
    fn email_shape_is_enforced() {
        let mut form = complete_form();
        for bad in ["", "plainaddress", "a@b", "a b@c.d", "a@b c.d", "@c.d"] {
            form.email = bad.into();
            let errors = RfqService::validate_form(&form, 4);
            assert_eq!(
                errors.get("email"),
                Some(&"Please enter a valid email address"),
                "expected rejection for {:?}",
                bad
            );
        }

        form.email = "valid@example.com".into();
        assert!(RfqService::validate_form(&form, 4).is_empty());
    }

    #[test]
    fn whitespace_only_values_are_rejected() {
        let mut form = complete_form();
        form.quantity = "   ".into();
        let errors = RfqService::validate_form(&form, 4);
        assert_eq!(errors.get("quantity"), Some(&"Quantity is required"));
    }

    #[test]
    fn complete_form_passes_at_every_step() {
        let form = complete_form();
        for step in 1..=LAST_INPUT_STEP {
            assert!(RfqService::validate_form(&form, step).is_empty());
        }
    }
}
