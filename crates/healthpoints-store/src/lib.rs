#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Remote entity store and view session roles for the HealthPoints client.
//!
//! One [`EntityStore`] instance per entity type is the single source of truth
//! for that type's client-side view of server state: the cached collection,
//! the focused record, the request phase, and the one-shot write-success
//! event. The session types under [`sessions`] encode the list, detail, edit,
//! and delete view roles as explicit state machines driving a shared store.
//!
//! Layout:
//! - `gateway.rs`: one HTTP round trip per named operation
//! - `store.rs`: the phase machine and cached state
//! - `paging.rs`: pure pagination helpers (page merging, Link header)
//! - `sessions/`: the four view roles
//! - `users.rs`: user directory provider for reference fields

mod error;
mod gateway;
pub mod paging;
pub mod sessions;
mod store;
mod users;

pub use error::StoreError;
pub use gateway::{EntityGateway, PageEnvelope};
pub use store::{EntityStore, Phase, WriteKind};
pub use users::UserDirectory;
