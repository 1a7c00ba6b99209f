//! Client-side cache and request phase machine for one entity type.

use healthpoints_models::{EntityRecord, PaginationMode};

use crate::error::StoreError;
use crate::gateway::{EntityGateway, PageEnvelope};
use crate::paging::{PageQuery, merge_pages};

/// Lifecycle of the store's current request.
///
/// At most one request is in flight per store; reads and writes report
/// distinct busy phases so views can render spinners and disable submit
/// buttons independently.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// No request in flight and the last one succeeded.
    #[default]
    Idle,
    /// A read (list, search, or single fetch) is in flight.
    Loading,
    /// A write (create, update, or delete) is in flight.
    Updating,
    /// The last request failed; cached data is retained.
    Error(String),
}

/// Which kind of write produced the pending success event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// A record was created.
    Created,
    /// A record was replaced or patched.
    Updated,
    /// A record was deleted.
    Deleted,
}

/// Single source of truth for one entity type's client-side view of server
/// state.
///
/// Holds the cached collection, the focused record, the request [`Phase`],
/// and a one-shot write-success event consumed via [`take_write_success`].
/// Starting any request clears a pending event and a previous error; a failed
/// request records the error but keeps whatever data was already cached.
///
/// [`take_write_success`]: Self::take_write_success
#[derive(Debug)]
pub struct EntityStore<E: EntityRecord> {
    gateway: EntityGateway<E>,
    entities: Vec<E>,
    entity: E,
    phase: Phase,
    write_success: Option<WriteKind>,
    total_items: u64,
    next_page: Option<u64>,
}

impl<E: EntityRecord> EntityStore<E> {
    /// Build a store around a gateway, with an empty cache.
    #[must_use]
    pub fn new(gateway: EntityGateway<E>) -> Self {
        Self {
            gateway,
            entities: Vec::new(),
            entity: E::default(),
            phase: Phase::Idle,
            write_success: None,
            total_items: 0,
            next_page: None,
        }
    }

    /// Cached collection, in accumulation order.
    #[must_use]
    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    /// The focused record; defaulted until a fetch or write populates it.
    #[must_use]
    pub const fn entity(&self) -> &E {
        &self.entity
    }

    /// Current request phase.
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Message of the most recent failure, if the store is in the error
    /// phase.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Collection size advertised by the server on the last page fetch.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Next fetchable page index, when the server advertised one.
    #[must_use]
    pub const fn next_page(&self) -> Option<u64> {
        self.next_page
    }

    /// Consume the pending write-success event, if one is waiting.
    ///
    /// The event is set exactly once per successful write and cleared both by
    /// this call and by the start of any subsequent request, so at most one
    /// observer acts on each write.
    pub const fn take_write_success(&mut self) -> Option<WriteKind> {
        self.write_success.take()
    }

    /// Drop all cached state and return to the idle phase.
    pub fn reset(&mut self) {
        self.entities.clear();
        self.entity = E::default();
        self.phase = Phase::Idle;
        self.write_success = None;
        self.total_items = 0;
        self.next_page = None;
    }

    /// Fetch one page of the collection and fold it into the cache.
    ///
    /// Infinite-scroll entities append pages (page zero replaces, later pages
    /// merge by identifier); full-page entities replace the cache wholesale.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`]; the store moves to the error
    /// phase and keeps previously cached records.
    pub async fn fetch_list(&mut self, query: &PageQuery) -> Result<(), StoreError> {
        self.begin(Phase::Loading);
        match self.gateway.list(query).await {
            Ok(envelope) => {
                self.apply_page(query.page, envelope);
                self.phase = Phase::Idle;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Fetch one page of search results and fold it into the cache, using
    /// the same accumulation rules as [`fetch_list`](Self::fetch_list).
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`]; the store moves to the error
    /// phase and keeps previously cached records.
    pub async fn search(&mut self, needle: &str, query: &PageQuery) -> Result<(), StoreError> {
        self.begin(Phase::Loading);
        match self.gateway.search(needle, query).await {
            Ok(envelope) => {
                self.apply_page(query.page, envelope);
                self.phase = Phase::Idle;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Fetch one record into the focused slot.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`]; the store moves to the error
    /// phase and the previously focused record is retained.
    pub async fn fetch_one(&mut self, id: i64) -> Result<(), StoreError> {
        self.begin(Phase::Loading);
        match self.gateway.get(id).await {
            Ok(record) => {
                self.entity = record;
                self.phase = Phase::Idle;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Create a record; on success the created copy becomes the focused
    /// record and a [`WriteKind::Created`] event is raised.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`] and moves the store to the
    /// error phase.
    pub async fn create(&mut self, record: &E) -> Result<(), StoreError> {
        self.begin(Phase::Updating);
        match self.gateway.create(record).await {
            Ok(created) => {
                self.finish_write(created, WriteKind::Created).await;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Replace a record wholesale; on success the server copy becomes the
    /// focused record and a [`WriteKind::Updated`] event is raised.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`] and moves the store to the
    /// error phase.
    pub async fn update(&mut self, record: &E) -> Result<(), StoreError> {
        self.begin(Phase::Updating);
        match self.gateway.update(record).await {
            Ok(updated) => {
                self.finish_write(updated, WriteKind::Updated).await;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Patch only the populated fields of a record; otherwise behaves like
    /// [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`] and moves the store to the
    /// error phase.
    pub async fn partial_update(&mut self, record: &E) -> Result<(), StoreError> {
        self.begin(Phase::Updating);
        match self.gateway.partial_update(record).await {
            Ok(updated) => {
                self.finish_write(updated, WriteKind::Updated).await;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Delete a record; on success the focused record resets to its default
    /// and a [`WriteKind::Deleted`] event is raised. The cached collection
    /// is not purged locally; refreshes pick up the removal.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`] and moves the store to the
    /// error phase.
    pub async fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        self.begin(Phase::Updating);
        match self.gateway.delete(id).await {
            Ok(()) => {
                self.finish_write(E::default(), WriteKind::Deleted).await;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn begin(&mut self, phase: Phase) {
        self.phase = phase;
        self.write_success = None;
    }

    fn fail(&mut self, err: StoreError) -> StoreError {
        tracing::debug!(entity = E::NAME, error = %err, "store request failed");
        self.phase = Phase::Error(err.to_string());
        err
    }

    async fn finish_write(&mut self, record: E, kind: WriteKind) {
        self.entity = record;
        if E::REFETCH_AFTER_WRITE {
            // A failed refresh must not mask the committed write; it is
            // logged and the stale collection stays cached.
            match self.gateway.list(&PageQuery::default()).await {
                Ok(envelope) => self.apply_page(0, envelope),
                Err(err) => {
                    tracing::warn!(entity = E::NAME, error = %err, "post-write refresh failed");
                }
            }
        }
        self.phase = Phase::Idle;
        self.write_success = Some(kind);
    }

    fn apply_page(&mut self, page: u64, envelope: PageEnvelope<E>) {
        let PageEnvelope {
            records,
            total_items,
            next_page,
        } = envelope;

        self.entities = match E::PAGINATION {
            PaginationMode::InfiniteScroll if page > 0 => {
                merge_pages(std::mem::take(&mut self.entities), records, EntityRecord::id)
            }
            PaginationMode::InfiniteScroll | PaginationMode::FullPage => records,
        };
        self.total_items = total_items
            .unwrap_or_else(|| u64::try_from(self.entities.len()).unwrap_or(u64::MAX));
        self.next_page = next_page;
    }
}
