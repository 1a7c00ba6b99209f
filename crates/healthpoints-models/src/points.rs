//! Daily exercise/diet points entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityRecord, PaginationMode};
use crate::user::UserRef;
use crate::validate::FieldRule;

/// One day's points: a unit each for exercise, healthy meals, and skipping
/// alcohol, plus free-text notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Points {
    /// Server-assigned identifier.
    pub id: Option<i64>,
    /// Calendar day the points apply to.
    pub date: Option<NaiveDate>,
    /// 1 when the user exercised that day.
    pub exercise: Option<i32>,
    /// 1 when the user ate healthy meals that day.
    pub meals: Option<i32>,
    /// 1 when the user skipped alcohol that day.
    pub alcohol: Option<i32>,
    /// Free-text notes, at most 140 characters.
    pub notes: Option<String>,
    /// Owning user.
    pub user: Option<UserRef>,
}

const RULES: &[FieldRule] = &[
    FieldRule::new("date").required(),
    FieldRule::new("exercise").numeric(),
    FieldRule::new("meals").numeric(),
    FieldRule::new("alcohol").numeric(),
    FieldRule::new("notes").max_length(140),
];

impl EntityRecord for Points {
    const RESOURCE: &'static str = "points";
    const NAME: &'static str = "points";
    const PAGINATION: PaginationMode = PaginationMode::FullPage;
    const REFETCH_AFTER_WRITE: bool = true;
    const DATETIME_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn rules() -> &'static [FieldRule] {
        RULES
    }
}
