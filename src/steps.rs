//! Static catalog of the predefined trading-process stages.
//!
//! Persisted step records carry only the step number; titles, descriptions,
//! icon tags, and default action lists are resolved against this catalog at
//! read time. Icons are opaque string tags for the presentation layer.

use serde::Serialize;
use utoipa::ToSchema;

/// One predefined stage of the trading process.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct StepTemplate {
    /// 1-based position in the process
    pub number: i32,
    pub title: &'static str,
    pub description: &'static str,
    /// Opaque icon tag resolved by the front end
    pub icon: &'static str,
    /// Default required actions, in order
    pub default_actions: &'static [&'static str],
}

pub static STEP_TEMPLATES: &[StepTemplate] = &[
    StepTemplate {
        number: 1,
        title: "Initial Inquiry",
        description: "Client submits product requirements and specifications",
        icon: "message-square",
        default_actions: &[
            "Submit RFQ form",
            "Provide product specifications",
            "Indicate quantity required",
            "Specify delivery location",
        ],
    },
    StepTemplate {
        number: 2,
        title: "Quotation",
        description: "Price quotation and terms preparation",
        icon: "file-text",
        default_actions: &[
            "Review price quotation",
            "Check payment terms",
            "Verify delivery timeline",
            "Confirm product specifications",
        ],
    },
    StepTemplate {
        number: 3,
        title: "Contract & Documentation",
        description: "Contract preparation and signing",
        icon: "clipboard-check",
        default_actions: &[
            "Review contract terms",
            "Sign agreement",
            "Submit company documents",
            "Provide bank details",
        ],
    },
    StepTemplate {
        number: 4,
        title: "Product Sourcing",
        description: "Sourcing and quality verification",
        icon: "search",
        default_actions: &[
            "Quality inspection arrangement",
            "Sample verification",
            "Certificate verification",
            "Origin documentation",
        ],
    },
    StepTemplate {
        number: 5,
        title: "Payment Processing",
        description: "Payment processing and verification",
        icon: "dollar-sign",
        default_actions: &[
            "Process initial payment",
            "Verify fund transfer",
            "Issue payment receipt",
            "Update payment status",
        ],
    },
    StepTemplate {
        number: 6,
        title: "Shipping & Logistics",
        description: "Shipping arrangement and documentation",
        icon: "ship",
        default_actions: &[
            "Book vessel/transport",
            "Prepare shipping documents",
            "Arrange inspection",
            "Process customs clearance",
        ],
    },
    StepTemplate {
        number: 7,
        title: "Delivery",
        description: "Final delivery and documentation",
        icon: "package",
        default_actions: &[
            "Track shipment",
            "Coordinate delivery",
            "Verify documentation",
            "Confirm receipt",
        ],
    },
];

/// Look up a template by its step number.
pub fn template(number: i32) -> Option<&'static StepTemplate> {
    STEP_TEMPLATES.iter().find(|t| t.number == number)
}

/// The template that follows `number` in the process, if any.
pub fn next_template(number: i32) -> Option<&'static StepTemplate> {
    template(number + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_dense_and_ordered() {
        for (idx, tpl) in STEP_TEMPLATES.iter().enumerate() {
            assert_eq!(tpl.number, idx as i32 + 1);
            assert!(!tpl.default_actions.is_empty());
        }
    }

    #[test]
    fn next_template_stops_at_delivery() {
        assert_eq!(next_template(1).unwrap().title, "Quotation");
        assert!(next_template(7).is_none());
        assert!(template(0).is_none());
    }
}
