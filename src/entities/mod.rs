pub mod product;
pub mod rfq_submission;
pub mod shipment;
pub mod trading_step;
pub mod user;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// List of text labels stored as a JSON column.
///
/// Used for step action lists and product specification/certification lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct TextList(pub Vec<String>);

impl TextList {
    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for TextList {
    fn from(labels: Vec<String>) -> Self {
        Self(labels)
    }
}

impl From<&[&str]> for TextList {
    fn from(labels: &[&str]) -> Self {
        Self(labels.iter().map(|l| (*l).to_string()).collect())
    }
}
