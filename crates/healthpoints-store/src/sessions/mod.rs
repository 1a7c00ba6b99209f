//! The four view roles, encoded as explicit state machines over a shared
//! [`crate::EntityStore`].
//!
//! Sessions own view-local state (active page, sort, form values, dialog
//! flags); all server state lives in the store they drive. Navigation is a
//! returned [`Nav`] signal, never a side effect.

mod delete;
mod detail;
mod edit;
mod list;

pub use delete::DeleteSession;
pub use detail::DetailSession;
pub use edit::{EditMode, EditSession, SubmitError};
pub use list::ListSession;

/// Where the caller should take the view after a session step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    /// Remain on the current view.
    Stay,
    /// Return to the entity's list view.
    BackToList,
}
