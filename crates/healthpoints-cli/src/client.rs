//! Shared client wiring and error types for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::anyhow;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use url::Url;

use healthpoints_models::EntityRecord;
use healthpoints_store::sessions::SubmitError;
use healthpoints_store::{EntityGateway, EntityStore, StoreError, UserDirectory};

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
}

impl AppContext {
    /// Build the HTTP client from CLI options: request timeout, a request
    /// identifier header, and the bearer token when one is configured.
    pub(crate) fn from_options(
        base_url: Url,
        timeout_secs: u64,
        token: Option<&str>,
        trace_id: &str,
    ) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        if let Some(token) = token {
            let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| CliError::validation("API token contains invalid characters"))?;
            default_headers.insert(reqwest::header::AUTHORIZATION, bearer);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self { client, base_url })
    }

    /// A fresh store for one entity type, sharing the configured client.
    pub(crate) fn store<E: EntityRecord>(&self) -> EntityStore<E> {
        EntityStore::new(EntityGateway::new(self.client.clone(), self.base_url.clone()))
    }

    /// The user directory, sharing the configured client.
    pub(crate) fn directory(&self) -> UserDirectory {
        UserDirectory::new(self.client.clone(), self.base_url.clone())
    }
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Millisecond timestamp used to build request identifiers.
#[must_use]
pub(crate) fn timestamp_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Classify a store failure into a CLI error.
///
/// Client-addressable failures (validation rejections, unknown identifiers)
/// become validation errors with exit code 2; everything else is operational.
pub(crate) fn store_error(err: StoreError) -> CliError {
    match &err {
        StoreError::NotFound { .. } => CliError::validation(err.to_string()),
        StoreError::Http {
            status: 400 | 409 | 422,
            message,
        } => CliError::validation(message.clone()),
        _ => CliError::failure(anyhow!(err.to_string())),
    }
}

/// Classify a form submission failure into a CLI error.
pub(crate) fn submit_error(err: SubmitError) -> CliError {
    match err {
        SubmitError::Invalid(violations) => {
            let detail = violations
                .iter()
                .map(|violation| format!("{}: {}", violation.field, violation.message))
                .collect::<Vec<_>>()
                .join("; ");
            CliError::validation(detail)
        }
        SubmitError::Busy => CliError::failure(anyhow!("a submission is already in flight")),
        SubmitError::Store(err) => store_error(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthpoints_models::FieldViolation;

    #[test]
    fn parse_url_rejects_invalid_input() {
        let err = parse_url("not-a-url").expect_err("invalid URL should fail");
        assert!(err.contains("invalid URL"));
    }

    #[test]
    fn not_found_maps_to_validation() {
        let err = store_error(StoreError::NotFound {
            name: "weight",
            id: 7,
        });
        assert!(matches!(err, CliError::Validation(message) if message.contains("weight 7")));
        assert_eq!(
            store_error(StoreError::NotFound {
                name: "weight",
                id: 7
            })
            .exit_code(),
            2
        );
    }

    #[test]
    fn server_faults_map_to_failure() {
        let err = store_error(StoreError::Http {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn violations_join_into_one_message() {
        let err = submit_error(SubmitError::Invalid(vec![
            FieldViolation {
                field: "systolic".to_string(),
                message: "this field is required".to_string(),
            },
            FieldViolation {
                field: "diastolic".to_string(),
                message: "this field should be a number".to_string(),
            },
        ]));
        match err {
            CliError::Validation(message) => {
                assert!(message.contains("systolic: this field is required"));
                assert!(message.contains("diastolic:"));
            }
            CliError::Failure(_) => panic!("expected a validation error"),
        }
    }
}
