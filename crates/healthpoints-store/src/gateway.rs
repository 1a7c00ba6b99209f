//! One HTTP round trip per named store operation.

use std::marker::PhantomData;
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;

use healthpoints_models::{EntityRecord, ProblemDetails, clean_record};

use crate::error::StoreError;
use crate::paging::{PageQuery, parse_next_page};

const HEADER_TOTAL_COUNT: &str = "x-total-count";
const HEADER_LINK: &str = "link";

/// A fetched page plus the pagination metadata carried in response headers.
#[derive(Debug, Clone)]
pub struct PageEnvelope<E> {
    /// Records in this page, in server order.
    pub records: Vec<E>,
    /// Collection size advertised by the `X-Total-Count` header.
    pub total_items: Option<u64>,
    /// Next fetchable page index from the `Link` header, if any.
    pub next_page: Option<u64>,
}

/// HTTP access to one entity resource.
///
/// Every method is a single request/response exchange; state accumulation
/// lives in [`crate::EntityStore`].
#[derive(Debug, Clone)]
pub struct EntityGateway<E> {
    client: Client,
    base_url: Url,
    _marker: PhantomData<E>,
}

impl<E: EntityRecord> EntityGateway<E> {
    /// Build a gateway for the entity resource rooted at `base_url`.
    #[must_use]
    pub const fn new(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            _marker: PhantomData,
        }
    }

    fn collection_url(&self) -> Result<Url, StoreError> {
        Ok(self.base_url.join(&format!("/api/{}", E::RESOURCE))?)
    }

    fn record_url(&self, id: i64) -> Result<Url, StoreError> {
        Ok(self.base_url.join(&format!("/api/{}/{id}", E::RESOURCE))?)
    }

    fn search_url(&self) -> Result<Url, StoreError> {
        Ok(self
            .base_url
            .join(&format!("/api/_search/{}", E::RESOURCE))?)
    }

    fn apply_page(url: &mut Url, query: &PageQuery) {
        if let Some(sort) = &query.sort {
            url.query_pairs_mut()
                .append_pair("page", &query.page.to_string())
                .append_pair("size", &query.size.to_string())
                .append_pair("sort", &sort.to_query());
        }
        url.query_pairs_mut()
            .append_pair("cacheBuster", &epoch_millis().to_string());
    }

    /// Fetch one page of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the request fails, the server answers with
    /// a non-2xx status, or the body does not decode.
    pub async fn list(&self, query: &PageQuery) -> Result<PageEnvelope<E>, StoreError> {
        let mut url = self.collection_url()?;
        Self::apply_page(&mut url, query);
        self.fetch_page(url).await
    }

    /// Fetch one page of search results for `needle`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the request fails, the server answers with
    /// a non-2xx status, or the body does not decode.
    pub async fn search(
        &self,
        needle: &str,
        query: &PageQuery,
    ) -> Result<PageEnvelope<E>, StoreError> {
        let mut url = self.search_url()?;
        url.query_pairs_mut().append_pair("query", needle);
        Self::apply_page(&mut url, query);
        self.fetch_page(url).await
    }

    async fn fetch_page(&self, url: Url) -> Result<PageEnvelope<E>, StoreError> {
        let response = self.send_get(url).await?;
        let response = check_status::<E>(response, None).await?;

        let total_items = response
            .headers()
            .get(HEADER_TOTAL_COUNT)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());
        let next_page = response
            .headers()
            .get(HEADER_LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_next_page);

        let records = response.json().await.map_err(|source| StoreError::Decode {
            name: E::NAME,
            source,
        })?;

        Ok(PageEnvelope {
            records,
            total_items,
            next_page,
        })
    }

    /// Fetch one record by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown identifier, or another
    /// [`StoreError`] on transport, status, or decode failure.
    pub async fn get(&self, id: i64) -> Result<E, StoreError> {
        let mut url = self.record_url(id)?;
        url.query_pairs_mut()
            .append_pair("cacheBuster", &epoch_millis().to_string());
        let response = self.send_get(url).await?;
        let response = check_status::<E>(response, Some(id)).await?;
        decode_record::<E>(response).await
    }

    /// Create a record; the identifier is stripped before submission and the
    /// server-assigned copy is returned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the request fails, the server rejects the
    /// payload, or the body does not decode.
    pub async fn create(&self, record: &E) -> Result<E, StoreError> {
        let url = self.collection_url()?;
        let body = cleaned(record, true)?;
        let response = self
            .client
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        let response = check_status::<E>(response, None).await?;
        decode_record::<E>(response).await
    }

    /// Replace an existing record wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingId`] when the record has no identifier,
    /// or another [`StoreError`] on transport, status, or decode failure.
    pub async fn update(&self, record: &E) -> Result<E, StoreError> {
        let id = record.id().ok_or(StoreError::MissingId { name: E::NAME })?;
        let url = self.record_url(id)?;
        let body = cleaned(record, false)?;
        let response = self
            .client
            .put(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        let response = check_status::<E>(response, Some(id)).await?;
        decode_record::<E>(response).await
    }

    /// Apply only the populated fields of `record` to the stored copy.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingId`] when the record has no identifier,
    /// or another [`StoreError`] on transport, status, or decode failure.
    pub async fn partial_update(&self, record: &E) -> Result<E, StoreError> {
        let id = record.id().ok_or(StoreError::MissingId { name: E::NAME })?;
        let url = self.record_url(id)?;
        let body = cleaned(record, false)?;
        let response = self
            .client
            .patch(url.clone())
            .header("content-type", "application/merge-patch+json")
            .json(&body)
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        let response = check_status::<E>(response, Some(id)).await?;
        decode_record::<E>(response).await
    }

    /// Delete one record by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown identifier, or another
    /// [`StoreError`] on transport or status failure.
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let url = self.record_url(id)?;
        let response = self
            .client
            .delete(url.clone())
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        check_status::<E>(response, Some(id)).await?;
        Ok(())
    }

    async fn send_get(&self, url: Url) -> Result<Response, StoreError> {
        self.client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| transport(&url, source))
    }
}

fn cleaned<E: EntityRecord>(record: &E, strip_id: bool) -> Result<Value, StoreError> {
    let value = serde_json::to_value(record).map_err(|source| StoreError::Encode {
        name: E::NAME,
        source,
    })?;
    Ok(clean_record(value, strip_id))
}

fn transport(url: &Url, source: reqwest::Error) -> StoreError {
    StoreError::Transport {
        url: url.to_string(),
        source,
    }
}

async fn decode_record<E: EntityRecord>(response: Response) -> Result<E, StoreError> {
    response.json().await.map_err(|source| StoreError::Decode {
        name: E::NAME,
        source,
    })
}

/// Map a non-2xx response to a [`StoreError`], preferring the problem
/// document's detail over the raw body.
async fn check_status<E: EntityRecord>(
    response: Response,
    id: Option<i64>,
) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND
        && let Some(id) = id
    {
        return Err(StoreError::NotFound { name: E::NAME, id });
    }

    let bytes = response.bytes().await.unwrap_or_default();
    let body_text = String::from_utf8_lossy(&bytes).to_string();
    let message = serde_json::from_slice::<ProblemDetails>(&bytes)
        .map_or_else(|_| body_text.trim().to_string(), |p| problem_message(&p));

    Err(StoreError::Http {
        status: status.as_u16(),
        message,
    })
}

fn problem_message(problem: &ProblemDetails) -> String {
    if let Some(detail) = &problem.detail {
        return detail.clone();
    }
    if problem.field_errors.is_empty() {
        return problem.title.clone();
    }
    let fields = problem
        .field_errors
        .iter()
        .map(|err| format!("{}: {}", err.field, err.message))
        .collect::<Vec<_>>()
        .join("; ");
    format!("{}: {fields}", problem.title)
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthpoints_models::Weight;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;

    fn gateway(server: &MockServer) -> EntityGateway<Weight> {
        let base = server
            .base_url()
            .parse()
            .expect("mock server URL must parse");
        EntityGateway::new(Client::new(), base)
    }

    fn page() -> PageQuery {
        PageQuery {
            sort: Some(crate::paging::SortSpec::by("id")),
            ..PageQuery::default()
        }
    }

    #[tokio::test]
    async fn list_carries_pagination_and_headers() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/weights")
                .query_param("page", "0")
                .query_param("size", "20")
                .query_param("sort", "id,asc")
                .query_param_exists("cacheBuster");
            then.status(200)
                .header("X-Total-Count", "42")
                .header(
                    "Link",
                    "<http://localhost/api/weights?page=1&size=20>; rel=\"next\"",
                )
                .json_body(json!([{"id": 1, "weight": 79.5}]));
        });

        let envelope = gateway(&server)
            .list(&page())
            .await
            .expect("list should succeed");

        mock.assert();
        assert_eq!(envelope.records.len(), 1);
        assert_eq!(envelope.records[0].id, Some(1));
        assert_eq!(envelope.total_items, Some(42));
        assert_eq!(envelope.next_page, Some(1));
    }

    #[tokio::test]
    async fn unsorted_list_omits_pagination_params() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/weights")
                .query_param_missing("page")
                .query_param_missing("size")
                .query_param_missing("sort")
                .query_param_exists("cacheBuster");
            then.status(200).json_body(json!([]));
        });

        let envelope = gateway(&server)
            .list(&PageQuery::default())
            .await
            .expect("list should succeed");

        mock.assert();
        assert!(envelope.records.is_empty());
        assert_eq!(envelope.total_items, None);
        assert_eq!(envelope.next_page, None);
    }

    #[tokio::test]
    async fn search_targets_search_endpoint() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/_search/weights")
                .query_param("query", "80");
            then.status(200).json_body(json!([{"id": 3, "weight": 80.0}]));
        });

        let envelope = gateway(&server)
            .search("80", &page())
            .await
            .expect("search should succeed");

        mock.assert();
        assert_eq!(envelope.records[0].id, Some(3));
    }

    #[tokio::test]
    async fn get_maps_missing_record_to_not_found() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/weights/9");
            then.status(404);
        });

        let err = gateway(&server).get(9).await.expect_err("must be an error");
        assert!(matches!(
            err,
            StoreError::NotFound {
                name: "weight",
                id: 9
            }
        ));
    }

    #[tokio::test]
    async fn create_strips_identifier_and_empty_fields() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/weights")
                .json_body(json!({"weight": 81.2}));
            then.status(201).json_body(json!({"id": 5, "weight": 81.2}));
        });

        let record = Weight {
            id: Some(99),
            weight: Some(81.2),
            ..Weight::default()
        };
        let created = gateway(&server)
            .create(&record)
            .await
            .expect("create should succeed");

        mock.assert();
        assert_eq!(created.id, Some(5));
    }

    #[tokio::test]
    async fn partial_update_patches_with_merge_content_type() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/api/weights/5")
                .header("content-type", "application/merge-patch+json")
                .json_body(json!({"id": 5, "weight": 82.0}));
            then.status(200)
                .json_body(json!({"id": 5, "weight": 82.0, "timestamp": "2024-05-01T08:30:00Z"}));
        });

        let record = Weight {
            id: Some(5),
            weight: Some(82.0),
            ..Weight::default()
        };
        let updated = gateway(&server)
            .partial_update(&record)
            .await
            .expect("patch should succeed");

        mock.assert();
        assert_eq!(updated.weight, Some(82.0));
        assert!(updated.timestamp.is_some());
    }

    #[tokio::test]
    async fn update_without_id_is_rejected_locally() {
        let server = MockServer::start_async().await;
        let err = gateway(&server)
            .update(&Weight::default())
            .await
            .expect_err("must be an error");
        assert!(matches!(err, StoreError::MissingId { name: "weight" }));
    }

    #[tokio::test]
    async fn problem_detail_is_surfaced_on_failure() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/weights");
            then.status(400).json_body(json!({
                "type": "https://example.com/problem/problem-with-message",
                "title": "Bad Request",
                "status": 400,
                "detail": "weight must be positive"
            }));
        });

        let err = gateway(&server)
            .create(&Weight::default())
            .await
            .expect_err("must be an error");
        match err {
            StoreError::Http { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "weight must be positive");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn field_errors_are_surfaced_when_detail_is_absent() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/weights");
            then.status(400).json_body(json!({
                "type": "https://example.com/problem/constraint-violation",
                "title": "Method argument not valid",
                "status": 400,
                "fieldErrors": [
                    {"objectName": "weight", "field": "weight", "message": "must not be null"}
                ]
            }));
        });

        let err = gateway(&server)
            .create(&Weight::default())
            .await
            .expect_err("must be an error");
        match err {
            StoreError::Http { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(
                    message,
                    "Method argument not valid: weight: must not be null"
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn delete_issues_delete_verb() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/api/weights/4");
            then.status(204);
        });

        gateway(&server)
            .delete(4)
            .await
            .expect("delete should succeed");
        mock.assert();
    }
}
