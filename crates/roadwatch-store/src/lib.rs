pub mod error;
pub mod messages;
pub mod query;
pub mod reports;
pub mod subscribers;
pub mod users;

pub use error::StoreError;
pub use messages::MessageArchive;
pub use query::Select;
pub use reports::ReportStore;
pub use subscribers::SubscriberStore;
pub use users::UserStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Typed client for the remote store's REST interface. One instance is built
/// at startup and cloned into each service; clones share the underlying
/// connection pool.
#[derive(Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Filtered select returning all matching rows.
    pub(crate) async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Select,
    ) -> Result<Vec<T>, StoreError> {
        debug!(table, "store select");
        let response = self
            .authed(self.http.get(self.table_url(table)))
            .query(&query.into_params())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::from_response(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Insert one or more rows. The store's generated columns are not
    /// requested back.
    pub(crate) async fn insert<T: Serialize>(
        &self,
        table: &str,
        rows: &[T],
    ) -> Result<(), StoreError> {
        debug!(table, count = rows.len(), "store insert");
        let response = self
            .authed(self.http.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(StoreError::from_response(status.as_u16(), &body));
        }
        Ok(())
    }

    /// Invoke a named remote procedure with no arguments.
    pub(crate) async fn rpc(&self, function: &str) -> Result<(), StoreError> {
        debug!(function, "store rpc");
        let response = self
            .authed(self.http.post(self.rpc_url(function)))
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(StoreError::from_response(status.as_u16(), &body));
        }
        Ok(())
    }
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The api key stays out of debug output.
        f.debug_struct("StoreClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
