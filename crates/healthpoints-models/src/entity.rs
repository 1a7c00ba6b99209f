//! Trait implemented by every tracked record type.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::validate::FieldRule;

/// How list responses accumulate in the client-side cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Pages append to an accumulating buffer, deduplicated by identifier;
    /// the `Link` response header advertises whether more pages exist.
    InfiniteScroll,
    /// Each fetch replaces the cached collection wholesale.
    FullPage,
}

/// Metadata and accessors every tracked record type provides.
///
/// The constants parametrise the generic store: endpoint path, pagination
/// style, and which form fields need wire/edit datetime conversion. The
/// validation rule table is configuration data evaluated by the edit session
/// before submission ever reaches the store.
pub trait EntityRecord:
    Clone + Default + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Plural resource segment under `/api` (for example `blood-pressures`).
    const RESOURCE: &'static str;
    /// Singular entity name used in errors and log fields.
    const NAME: &'static str;
    /// Accumulation style for list/search fulfilments.
    const PAGINATION: PaginationMode;
    /// Whether a successful write immediately re-fetches the collection.
    const REFETCH_AFTER_WRITE: bool;
    /// Form fields carried as wire datetimes, converted to the editable
    /// `YYYY-MM-DDTHH:MM` format when a form is initialised and back when it
    /// is submitted.
    const DATETIME_FIELDS: &'static [&'static str];

    /// Server-assigned identifier; `None` for a not-yet-created record.
    fn id(&self) -> Option<i64>;

    /// Field-level validation rules applied before submission.
    fn rules() -> &'static [FieldRule];
}
