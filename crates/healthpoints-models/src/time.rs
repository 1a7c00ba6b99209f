//! Conversions between the wire datetime format and the editable form format.
//!
//! The wire carries RFC 3339 instants; edit forms work with local-style
//! `YYYY-MM-DDTHH:MM` strings (the `datetime-local` input format).

use chrono::{DateTime, SecondsFormat, Utc};

/// Format accepted and produced by edit forms.
pub const EDIT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Failure converting an edit-format string back to a wire instant.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid datetime '{input}': expected YYYY-MM-DDTHH:MM")]
pub struct ParseError {
    /// The rejected input.
    pub input: String,
}

/// Render a wire instant in the editable form format.
#[must_use]
pub fn to_edit_format(instant: DateTime<Utc>) -> String {
    instant.format(EDIT_FORMAT).to_string()
}

/// Parse an editable form value back into a wire instant.
///
/// # Errors
///
/// Returns [`ParseError`] when the input does not match [`EDIT_FORMAT`].
pub fn from_edit_format(input: &str) -> Result<DateTime<Utc>, ParseError> {
    chrono::NaiveDateTime::parse_from_str(input.trim(), EDIT_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| ParseError {
            input: input.to_string(),
        })
}

/// Default edit-form value for time-stamped entities: the current instant,
/// already in the editable format.
#[must_use]
pub fn default_edit_timestamp() -> String {
    to_edit_format(Utc::now())
}

/// Render a wire instant as an RFC 3339 string for display.
#[must_use]
pub fn to_wire_format(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
