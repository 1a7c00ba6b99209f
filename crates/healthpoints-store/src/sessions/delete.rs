//! Delete view role: the confirmation dialog.

use healthpoints_models::EntityRecord;

use crate::error::StoreError;
use crate::sessions::Nav;
use crate::store::{EntityStore, WriteKind};

/// State machine for an entity's delete confirmation dialog.
///
/// The dialog only closes on a deletion it witnessed itself: the `loaded`
/// flag set by activation gates the write event, so a stale event from
/// another view cannot dismiss a freshly opened dialog.
#[derive(Debug)]
pub struct DeleteSession {
    id: i64,
    loaded: bool,
}

impl DeleteSession {
    /// Dialog for the record with the given identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self { id, loaded: false }
    }

    /// Identifier the dialog is about to delete.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Open the dialog: fetch the record so the confirmation can display it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown identifier, or another
    /// [`StoreError`] on transport, status, or decode failure.
    pub async fn activate<E: EntityRecord>(
        &mut self,
        store: &mut EntityStore<E>,
    ) -> Result<(), StoreError> {
        store.fetch_one(self.id).await?;
        self.loaded = true;
        Ok(())
    }

    /// Confirm the deletion.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`]; the dialog stays open on
    /// failure.
    pub async fn confirm<E: EntityRecord>(
        &mut self,
        store: &mut EntityStore<E>,
    ) -> Result<Nav, StoreError> {
        store.delete(self.id).await?;
        Ok(self.observe(store))
    }

    /// React to a completed write: close the dialog only when it was opened
    /// normally and a deletion event is pending.
    pub fn observe<E: EntityRecord>(&self, store: &mut EntityStore<E>) -> Nav {
        if self.loaded && store.take_write_success() == Some(WriteKind::Deleted) {
            Nav::BackToList
        } else {
            Nav::Stay
        }
    }

    /// Dismiss the dialog without deleting.
    #[must_use]
    pub const fn cancel(&self) -> Nav {
        Nav::BackToList
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::EntityGateway;
    use healthpoints_models::Weight;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use reqwest::Client;
    use serde_json::json;

    fn store(server: &MockServer) -> EntityStore<Weight> {
        let base = server
            .base_url()
            .parse()
            .expect("mock server URL must parse");
        EntityStore::new(EntityGateway::new(Client::new(), base))
    }

    #[tokio::test]
    async fn confirm_deletes_and_closes() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/weights/5");
            then.status(200).json_body(json!({"id": 5, "weight": 80.0}));
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/api/weights/5");
            then.status(204);
        });

        let mut store = store(&server);
        let mut session = DeleteSession::new(5);
        session
            .activate(&mut store)
            .await
            .expect("activate should succeed");
        assert_eq!(store.entity().id, Some(5));

        let nav = session
            .confirm(&mut store)
            .await
            .expect("delete should succeed");

        delete.assert();
        assert_eq!(nav, Nav::BackToList);
        assert_eq!(store.entity().id, None);
    }

    #[tokio::test]
    async fn stale_event_does_not_close_an_unopened_dialog() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/api/weights/5");
            then.status(204);
        });

        let mut store = store(&server);
        store.delete(5).await.expect("delete should succeed");

        // A dialog that never activated must not react to the event.
        let session = DeleteSession::new(6);
        assert_eq!(session.observe(&mut store), Nav::Stay);
    }

    #[tokio::test]
    async fn failed_delete_keeps_dialog_open() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/weights/5");
            then.status(200).json_body(json!({"id": 5}));
        });
        server.mock(|when, then| {
            when.method(DELETE).path("/api/weights/5");
            then.status(500).body("boom");
        });

        let mut store = store(&server);
        let mut session = DeleteSession::new(5);
        session
            .activate(&mut store)
            .await
            .expect("activate should succeed");

        let err = session
            .confirm(&mut store)
            .await
            .expect_err("delete must fail");
        assert!(matches!(err, StoreError::Http { status: 500, .. }));
        assert_eq!(session.observe(&mut store), Nav::Stay);
    }

    #[tokio::test]
    async fn cancel_closes_without_deleting() {
        let session = DeleteSession::new(5);
        assert_eq!(session.cancel(), Nav::BackToList);
    }
}
