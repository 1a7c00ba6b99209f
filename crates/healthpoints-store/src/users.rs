//! User directory lookups backing the `user` reference field on edit forms.

use reqwest::{Client, Url};

use healthpoints_models::UserRef;

use crate::error::StoreError;

/// Read-only view of the server's user directory.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    client: Client,
    base_url: Url,
}

impl UserDirectory {
    /// Build a directory rooted at `base_url`.
    #[must_use]
    pub const fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Fetch all known users, for populating reference pickers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the request fails, the server answers with
    /// a non-2xx status, or the body does not decode.
    pub async fn fetch(&self) -> Result<Vec<UserRef>, StoreError> {
        let url = self.base_url.join("/api/users")?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| StoreError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Http {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        response.json().await.map_err(|source| StoreError::Decode {
            name: "user",
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn fetch_decodes_directory_entries() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/users");
            then.status(200).json_body(json!([
                {"id": 1, "login": "admin", "email": "admin@localhost"},
                {"id": 2, "login": "user"}
            ]));
        });

        let directory = UserDirectory::new(
            Client::new(),
            server.base_url().parse().expect("mock URL must parse"),
        );
        let users = directory.fetch().await.expect("fetch should succeed");

        mock.assert();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].login, "admin");
        assert_eq!(users[1].id, 2);
    }

    #[tokio::test]
    async fn non_success_surfaces_status() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/users");
            then.status(403).body("forbidden");
        });

        let directory = UserDirectory::new(
            Client::new(),
            server.base_url().parse().expect("mock URL must parse"),
        );
        let err = directory.fetch().await.expect_err("must be an error");
        assert!(matches!(err, StoreError::Http { status: 403, .. }));
    }
}
