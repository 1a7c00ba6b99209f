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
//! Entity records and wire DTOs for the HealthPoints API.
//!
//! These types are shared by the store and the CLI so the request/response
//! contract stays in one place: the four tracked record types, the user
//! reference resolved from the directory endpoint, the record-cleaning pass
//! applied before every write, and the per-entity validation rule tables the
//! edit session evaluates before submission.

mod blood_pressure;
mod clean;
mod entity;
mod points;
mod preferences;
mod problem;
pub mod time;
mod user;
mod validate;
mod weight;

pub use blood_pressure::BloodPressure;
pub use clean::clean_record;
pub use entity::{EntityRecord, PaginationMode};
pub use points::Points;
pub use preferences::{Preferences, WeightUnits};
pub use problem::{ProblemDetails, ProblemFieldError};
pub use user::UserRef;
pub use validate::{FieldRule, FieldViolation, validate};
pub use weight::Weight;
