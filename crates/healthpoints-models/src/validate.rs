//! Field-level validation evaluated before a form submission reaches the
//! store.
//!
//! Rules are plain configuration data declared per entity; a violation blocks
//! submission and is rendered inline next to the offending field, it never
//! turns into a store error.

use serde_json::{Map, Value};

/// Declarative constraints for a single form field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Wire name of the field the rule applies to.
    pub field: &'static str,
    /// The value must be present and non-empty.
    pub required: bool,
    /// The value must parse as a number.
    pub numeric: bool,
    /// Inclusive lower bound, checked when the value is numeric.
    pub min: Option<f64>,
    /// Inclusive upper bound, checked when the value is numeric.
    pub max: Option<f64>,
    /// Maximum string length in characters.
    pub max_length: Option<usize>,
}

impl FieldRule {
    /// Rule with no constraints beyond the field name.
    #[must_use]
    pub const fn new(field: &'static str) -> Self {
        Self {
            field,
            required: false,
            numeric: false,
            min: None,
            max: None,
            max_length: None,
        }
    }

    /// Mark the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Require the value to parse as a number.
    #[must_use]
    pub const fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    /// Set an inclusive lower bound.
    #[must_use]
    pub const fn min(mut self, value: f64) -> Self {
        self.min = Some(value);
        self
    }

    /// Set an inclusive upper bound.
    #[must_use]
    pub const fn max(mut self, value: f64) -> Self {
        self.max = Some(value);
        self
    }

    /// Set a maximum string length.
    #[must_use]
    pub const fn max_length(mut self, value: usize) -> Self {
        self.max_length = Some(value);
        self
    }
}

/// A single failed constraint, addressed to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Wire name of the offending field.
    pub field: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Evaluate a rule table against raw form values.
///
/// Returns every violation found; an empty vector means the form may be
/// submitted. Absent optional fields are skipped entirely.
#[must_use]
pub fn validate(values: &Map<String, Value>, rules: &[FieldRule]) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    for rule in rules {
        let value = values.get(rule.field).filter(|value| !value.is_null());
        let Some(value) = value else {
            if rule.required {
                violations.push(FieldViolation::new(rule.field, "this field is required"));
            }
            continue;
        };

        if rule.required && value.as_str().is_some_and(|text| text.trim().is_empty()) {
            violations.push(FieldViolation::new(rule.field, "this field is required"));
            continue;
        }

        let numeric_value = as_number(value);
        if rule.numeric && numeric_value.is_none() {
            violations.push(FieldViolation::new(rule.field, "this field should be a number"));
            continue;
        }

        if let Some(number) = numeric_value {
            if let Some(min) = rule.min
                && number < min
            {
                violations.push(FieldViolation::new(
                    rule.field,
                    format!("this field should be at least {min}"),
                ));
            }
            if let Some(max) = rule.max
                && number > max
            {
                violations.push(FieldViolation::new(
                    rule.field,
                    format!("this field cannot be more than {max}"),
                ));
            }
        }

        if let Some(max_length) = rule.max_length
            && let Some(text) = value.as_str()
            && text.chars().count() > max_length
        {
            violations.push(FieldViolation::new(
                rule.field,
                format!("this field cannot be longer than {max_length} characters"),
            ));
        }
    }

    violations
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}
