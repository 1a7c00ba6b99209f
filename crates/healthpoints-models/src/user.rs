//! Owning-user reference resolved from the user directory.

use serde::{Deserialize, Serialize};

/// Reference to the user owning a record, as returned by `GET /api/users`.
///
/// The directory payload carries more profile fields than this; only the
/// identifier and login are meaningful to reference resolution, the rest is
/// ignored on decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    /// Server-assigned user identifier.
    pub id: i64,
    /// Unique login name shown in list views and the edit-form select.
    pub login: String,
}
