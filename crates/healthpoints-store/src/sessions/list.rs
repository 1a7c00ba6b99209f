//! List view role: paging, sorting, searching, and infinite scroll.

use healthpoints_models::EntityRecord;

use crate::error::StoreError;
use crate::paging::{ITEMS_PER_PAGE, PageQuery, SortSpec};
use crate::store::EntityStore;

/// State machine for an entity's list view.
///
/// Tracks the one-based active page, the current ordering, and an optional
/// search query; the record cache itself lives in the store. Every activation
/// and sort change starts from a clean store so pages accumulated under one
/// ordering never mix with another.
#[derive(Debug)]
pub struct ListSession {
    active_page: u64,
    items_per_page: u64,
    sort: SortSpec,
    search: Option<String>,
}

impl Default for ListSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ListSession {
    /// A fresh session: page one, sorted by identifier ascending.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active_page: 1,
            items_per_page: ITEMS_PER_PAGE,
            sort: SortSpec::by("id"),
            search: None,
        }
    }

    /// Replace the initial ordering; intended for use before activation.
    #[must_use]
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// One-based page the session last requested.
    #[must_use]
    pub const fn active_page(&self) -> u64 {
        self.active_page
    }

    /// Current ordering.
    #[must_use]
    pub const fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Active search query, if the view is in search mode.
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Whether the server advertises pages beyond the active one.
    #[must_use]
    pub fn has_more<E: EntityRecord>(&self, store: &EntityStore<E>) -> bool {
        store
            .next_page()
            .is_some_and(|next| self.active_page - 1 < next)
    }

    /// Enter the list view: drop any cached pages and fetch page one.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`]; the failure is also recorded in
    /// the store's phase.
    pub async fn activate<E: EntityRecord>(
        &mut self,
        store: &mut EntityStore<E>,
    ) -> Result<(), StoreError> {
        store.reset();
        self.active_page = 1;
        self.fetch(store).await
    }

    /// Re-fetch from page one, keeping the current ordering and query.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`]; the failure is also recorded in
    /// the store's phase.
    pub async fn refresh<E: EntityRecord>(
        &mut self,
        store: &mut EntityStore<E>,
    ) -> Result<(), StoreError> {
        self.activate(store).await
    }

    /// Fetch the next page when the user has actually scrolled and the
    /// server advertises one; otherwise a no-op.
    ///
    /// The `scroll_offset` guard rejects the spurious sentinel event fired on
    /// initial render, which would otherwise double-fetch page two.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`]; the active page is not advanced
    /// on failure.
    pub async fn load_more<E: EntityRecord>(
        &mut self,
        store: &mut EntityStore<E>,
        scroll_offset: i64,
    ) -> Result<(), StoreError> {
        if scroll_offset <= 0 || !self.has_more(store) {
            return Ok(());
        }
        let next = self.active_page + 1;
        self.fetch_page(store, next).await?;
        self.active_page = next;
        Ok(())
    }

    /// Change the ordering: same field flips direction, a new field starts
    /// ascending. The cache is dropped and page one re-fetched.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`]; the failure is also recorded in
    /// the store's phase.
    pub async fn toggle_sort<E: EntityRecord>(
        &mut self,
        store: &mut EntityStore<E>,
        field: &str,
    ) -> Result<(), StoreError> {
        if self.sort.field == field {
            self.sort.order = self.sort.order.toggled();
        } else {
            self.sort = SortSpec::by(field);
        }
        self.activate(store).await
    }

    /// Enter search mode and fetch page one of the results; an empty needle
    /// leaves search mode instead.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`]; the failure is also recorded in
    /// the store's phase.
    pub async fn search<E: EntityRecord>(
        &mut self,
        store: &mut EntityStore<E>,
        needle: &str,
    ) -> Result<(), StoreError> {
        if needle.trim().is_empty() {
            return self.clear_search(store).await;
        }
        self.search = Some(needle.trim().to_string());
        self.activate(store).await
    }

    /// Leave search mode and re-fetch the plain collection.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`]; the failure is also recorded in
    /// the store's phase.
    pub async fn clear_search<E: EntityRecord>(
        &mut self,
        store: &mut EntityStore<E>,
    ) -> Result<(), StoreError> {
        self.search = None;
        self.activate(store).await
    }

    /// React to a completed write: when the store holds a pending
    /// write-success event, consume it and re-fetch from page one. Returns
    /// whether a refresh happened.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`] when the triggered refresh
    /// fails.
    pub async fn observe_write<E: EntityRecord>(
        &mut self,
        store: &mut EntityStore<E>,
    ) -> Result<bool, StoreError> {
        if store.take_write_success().is_none() {
            return Ok(false);
        }
        self.activate(store).await?;
        Ok(true)
    }

    async fn fetch<E: EntityRecord>(&self, store: &mut EntityStore<E>) -> Result<(), StoreError> {
        self.fetch_page(store, self.active_page).await
    }

    async fn fetch_page<E: EntityRecord>(
        &self,
        store: &mut EntityStore<E>,
        page: u64,
    ) -> Result<(), StoreError> {
        let query = PageQuery {
            page: page - 1,
            size: self.items_per_page,
            sort: Some(self.sort.clone()),
        };
        match &self.search {
            Some(needle) => store.search(needle, &query).await,
            None => store.fetch_list(&query).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::EntityGateway;
    use crate::paging::SortOrder;
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
    async fn activate_fetches_first_page_sorted_by_id() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/weights")
                .query_param("page", "0")
                .query_param("size", "20")
                .query_param("sort", "id,asc");
            then.status(200).json_body(json!([{"id": 1}]));
        });

        let mut store = store(&server);
        let mut session = ListSession::new();
        session
            .activate(&mut store)
            .await
            .expect("activate should succeed");

        mock.assert();
        assert_eq!(session.active_page(), 1);
        assert_eq!(store.entities().len(), 1);
    }

    #[tokio::test]
    async fn load_more_requires_scroll_and_next_page() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/weights").query_param("page", "0");
            then.status(200)
                .header(
                    "Link",
                    "<http://localhost/api/weights?page=1&size=20>; rel=\"next\"",
                )
                .json_body(json!([{"id": 1}]));
        });
        let second = server.mock(|when, then| {
            when.method(GET).path("/api/weights").query_param("page", "1");
            then.status(200).json_body(json!([{"id": 2}]));
        });

        let mut store = store(&server);
        let mut session = ListSession::new();
        session
            .activate(&mut store)
            .await
            .expect("activate should succeed");

        // Sentinel event from initial render: no scroll yet.
        session
            .load_more(&mut store, 0)
            .await
            .expect("guarded call should succeed");
        assert_eq!(second.calls(), 0);
        assert_eq!(session.active_page(), 1);

        session
            .load_more(&mut store, 240)
            .await
            .expect("load more should succeed");
        second.assert();
        assert_eq!(session.active_page(), 2);
        assert_eq!(store.entities().len(), 2);

        // No further next page advertised.
        session
            .load_more(&mut store, 480)
            .await
            .expect("exhausted call should succeed");
        assert_eq!(second.calls(), 1);
    }

    #[tokio::test]
    async fn toggle_sort_flips_and_resets() {
        let server = MockServer::start_async().await;
        let asc = server.mock(|when, then| {
            when.method(GET)
                .path("/api/weights")
                .query_param("sort", "id,asc");
            then.status(200).json_body(json!([{"id": 1}]));
        });
        let new_field = server.mock(|when, then| {
            when.method(GET)
                .path("/api/weights")
                .query_param("sort", "timestamp,asc");
            then.status(200).json_body(json!([{"id": 2}]));
        });
        let flipped = server.mock(|when, then| {
            when.method(GET)
                .path("/api/weights")
                .query_param("sort", "timestamp,desc");
            then.status(200).json_body(json!([{"id": 3}]));
        });

        let mut store = store(&server);
        let mut session = ListSession::new();
        session
            .activate(&mut store)
            .await
            .expect("activate should succeed");
        asc.assert();

        session
            .toggle_sort(&mut store, "timestamp")
            .await
            .expect("sort change should succeed");
        new_field.assert();
        assert_eq!(session.sort().field, "timestamp");
        assert_eq!(session.sort().order, SortOrder::Asc);
        assert_eq!(session.active_page(), 1);
        assert_eq!(store.entities().first().and_then(|w| w.id), Some(2));

        session
            .toggle_sort(&mut store, "timestamp")
            .await
            .expect("sort flip should succeed");
        flipped.assert();
        assert_eq!(session.sort().order, SortOrder::Desc);
        assert_eq!(store.entities().first().and_then(|w| w.id), Some(3));
    }

    #[tokio::test]
    async fn search_routes_to_search_endpoint_and_clears() {
        let server = MockServer::start_async().await;
        let search = server.mock(|when, then| {
            when.method(GET)
                .path("/api/_search/weights")
                .query_param("query", "80");
            then.status(200).json_body(json!([{"id": 3}]));
        });
        let list = server.mock(|when, then| {
            when.method(GET).path("/api/weights");
            then.status(200).json_body(json!([{"id": 1}]));
        });

        let mut store = store(&server);
        let mut session = ListSession::new();
        session
            .search(&mut store, "80")
            .await
            .expect("search should succeed");
        search.assert();
        assert_eq!(session.search_query(), Some("80"));

        session
            .search(&mut store, "  ")
            .await
            .expect("blank search clears");
        list.assert();
        assert_eq!(session.search_query(), None);
    }

    #[tokio::test]
    async fn observe_write_refreshes_once_per_event() {
        let server = MockServer::start_async().await;
        let list = server.mock(|when, then| {
            when.method(GET).path("/api/weights");
            then.status(200).json_body(json!([{"id": 1}]));
        });
        server.mock(|when, then| {
            when.method(DELETE).path("/api/weights/1");
            then.status(204);
        });

        let mut store = store(&server);
        let mut session = ListSession::new();
        session
            .activate(&mut store)
            .await
            .expect("activate should succeed");
        assert_eq!(list.calls(), 1);

        store.delete(1).await.expect("delete should succeed");
        assert!(
            session
                .observe_write(&mut store)
                .await
                .expect("refresh should succeed")
        );
        assert_eq!(list.calls(), 2);

        // The event was consumed; a second observation is a no-op.
        assert!(
            !session
                .observe_write(&mut store)
                .await
                .expect("observe should succeed")
        );
        assert_eq!(list.calls(), 2);
    }
}
