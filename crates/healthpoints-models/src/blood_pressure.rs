//! Blood pressure reading pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{EntityRecord, PaginationMode};
use crate::user::UserRef;
use crate::validate::FieldRule;

/// One systolic/diastolic reading taken at a point in time.
///
/// Every field is optional on the wire: the empty record doubles as the
/// unfocused store state and the create-form starting point.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BloodPressure {
    /// Server-assigned identifier.
    pub id: Option<i64>,
    /// Moment the reading was taken.
    pub timestamp: Option<DateTime<Utc>>,
    /// Systolic pressure in mmHg.
    pub systolic: Option<i32>,
    /// Diastolic pressure in mmHg.
    pub diastolic: Option<i32>,
    /// Owning user.
    pub user: Option<UserRef>,
}

const RULES: &[FieldRule] = &[
    FieldRule::new("timestamp").required(),
    FieldRule::new("systolic").required().numeric(),
    FieldRule::new("diastolic").required().numeric(),
];

impl EntityRecord for BloodPressure {
    const RESOURCE: &'static str = "blood-pressures";
    const NAME: &'static str = "bloodPressure";
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
