//! Detail view role: focus one record.

use healthpoints_models::EntityRecord;

use crate::error::StoreError;
use crate::store::EntityStore;

/// State machine for an entity's read-only detail view.
#[derive(Debug, Clone, Copy)]
pub struct DetailSession {
    id: i64,
}

impl DetailSession {
    /// Session for the record with the given identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    /// Identifier the view is focused on.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Enter the detail view: fetch the focused record into the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown identifier, or another
    /// [`StoreError`] on transport, status, or decode failure.
    pub async fn activate<E: EntityRecord>(
        &self,
        store: &mut EntityStore<E>,
    ) -> Result<(), StoreError> {
        store.fetch_one(self.id).await
    }
}
