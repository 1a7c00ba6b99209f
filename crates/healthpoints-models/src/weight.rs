//! Body weight measurement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{EntityRecord, PaginationMode};
use crate::user::UserRef;
use crate::validate::FieldRule;

/// One weight measurement taken at a point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Weight {
    /// Server-assigned identifier.
    pub id: Option<i64>,
    /// Moment the measurement was taken.
    pub timestamp: Option<DateTime<Utc>>,
    /// Measured weight in the user's preferred units.
    pub weight: Option<f64>,
    /// Owning user.
    pub user: Option<UserRef>,
}

const RULES: &[FieldRule] = &[
    FieldRule::new("timestamp").required(),
    FieldRule::new("weight").required().numeric(),
];

impl EntityRecord for Weight {
    const RESOURCE: &'static str = "weights";
    const NAME: &'static str = "weight";
    const PAGINATION: PaginationMode = PaginationMode::InfiniteScroll;
    const REFETCH_AFTER_WRITE: bool = false;
    const DATETIME_FIELDS: &'static [&'static str] = &["timestamp"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn rules() -> &'static [FieldRule] {
        RULES
    }
}
