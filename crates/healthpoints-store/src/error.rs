//! Store-level error type.

use thiserror::Error;

/// Failure raised by a store operation.
///
/// Validation never appears here: it is checked by the edit session before a
/// submission reaches the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested identifier does not correspond to an existing record.
    #[error("{name} {id} was not found")]
    NotFound {
        /// Entity name the lookup was issued for.
        name: &'static str,
        /// Identifier that failed to resolve.
        id: i64,
    },

    /// The server answered with a non-2xx status other than NotFound.
    #[error("request failed with status {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Problem detail or raw body excerpt.
        message: String,
    },

    /// The request never produced a usable response.
    #[error("request to {url} failed: {source}")]
    Transport {
        /// Request URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body did not decode into the expected shape.
    #[error("failed to decode {name} response: {source}")]
    Decode {
        /// Entity name the response was decoded for.
        name: &'static str,
        /// Underlying decode error.
        #[source]
        source: reqwest::Error,
    },

    /// The outgoing record did not serialize to JSON.
    #[error("failed to encode {name} record: {source}")]
    Encode {
        /// Entity name of the offending record.
        name: &'static str,
        /// Underlying encode error.
        #[source]
        source: serde_json::Error,
    },

    /// A write was issued for a record that has no identifier yet.
    #[error("{name} record has no identifier")]
    MissingId {
        /// Entity name of the offending record.
        name: &'static str,
    },

    /// The base URL and resource path did not combine into a valid URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
