//! RFC9457-compatible problem document surfaced on validation/runtime errors.

use serde::{Deserialize, Serialize};

/// Problem document returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    /// URI reference identifying the problem type.
    pub kind: String,
    /// Short, human-readable summary of the issue.
    pub title: String,
    /// HTTP status code associated with the error.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Detailed diagnostic message when available.
    pub detail: Option<String>,
    #[serde(
        default,
        rename = "fieldErrors",
        skip_serializing_if = "Vec::is_empty"
    )]
    /// Per-field rejections attached to a validation failure.
    pub field_errors: Vec<ProblemFieldError>,
}

/// One rejected field listed in a validation problem document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemFieldError {
    /// Wire name of the offending field.
    pub field: String,
    /// Human-readable description of the rejection.
    pub message: String,
}
