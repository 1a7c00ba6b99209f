//! Per-user tracking preferences.

use serde::{Deserialize, Serialize};

use crate::entity::{EntityRecord, PaginationMode};
use crate::user::UserRef;
use crate::validate::FieldRule;

/// Weight units a user can record measurements in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeightUnits {
    /// Kilograms.
    Kg,
    /// Pounds.
    Lb,
}

/// A user's goal and unit preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Server-assigned identifier.
    pub id: Option<i64>,
    /// Points target per week, between 10 and 21.
    pub weekly_goal: Option<i32>,
    /// Units weight measurements are recorded in.
    pub weight_units: Option<WeightUnits>,
    /// Owning user.
    pub user: Option<UserRef>,
}

const RULES: &[FieldRule] = &[
    FieldRule::new("weeklyGoal").required().numeric().min(10.0).max(21.0),
    FieldRule::new("weightUnits").required(),
];

impl EntityRecord for Preferences {
    const RESOURCE: &'static str = "preferences";
    const NAME: &'static str = "preferences";
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn weight_units_serialize_uppercase() {
        let record = Preferences {
            id: Some(1),
            weekly_goal: Some(15),
            weight_units: Some(WeightUnits::Kg),
            user: None,
        };
        let wire = serde_json::to_value(&record).expect("serializable");
        assert_eq!(wire["weightUnits"], json!("KG"));
        assert_eq!(wire["weeklyGoal"], json!(15));
    }
}
