//! REST client for the hosted tabular data service.
//!
//! Speaks the PostgREST-style wire protocol: tables are URL segments under
//! `/rest/v1/`, equality filters are `column=eq.value` query parameters, and
//! writes ask for `Prefer: return=representation` so inserted/updated rows
//! come back with their server-assigned fields.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::StoreConfig;

use super::{Direction, Filter, Query, StoreError, TabularStore};

/// How much of an error body to keep in logs and error values.
const ERROR_BODY_LIMIT: usize = 200;

/// Client for the hosted tabular store REST API.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct RestStore {
    inner: Arc<RestStoreInner>,
}

struct RestStoreInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            inner: Arc::new(RestStoreInner {
                client: reqwest::Client::new(),
                base_url: format!("{}/rest/v1", config.api_url.trim_end_matches('/')),
                api_key: config.exposed_api_key(),
            }),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.inner.base_url)
    }

    /// Attach auth headers common to every request.
    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.inner.api_key)
            .bearer_auth(&self.inner.api_key)
    }

    /// Render query filters/order/limit as PostgREST query parameters.
    fn query_params(query: &Query) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = query
            .filters
            .iter()
            .map(|f| (f.column.clone(), format!("eq.{}", filter_literal(&f.value))))
            .collect();

        if let Some((column, direction)) = &query.order {
            let dir = match direction {
                Direction::Ascending => "asc",
                Direction::Descending => "desc",
            };
            params.push(("order".to_owned(), format!("{column}.{dir}")));
        }
        if let Some(limit) = query.limit {
            params.push(("limit".to_owned(), limit.to_string()));
        }
        params
    }

    fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
        filters
            .iter()
            .map(|f| (f.column.clone(), format!("eq.{}", filter_literal(&f.value))))
            .collect()
    }

    /// Check the response status, returning the body text on success.
    async fn read_body(response: reqwest::Response) -> Result<String, StoreError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let truncated: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            tracing::error!(
                status = %status,
                body = %truncated,
                "store API returned non-success status"
            );
            return Err(StoreError::Api {
                status: status.as_u16(),
                body: truncated,
            });
        }
        Ok(body)
    }

    async fn read_rows(response: reqwest::Response) -> Result<Vec<Value>, StoreError> {
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Render a JSON value as a bare PostgREST filter literal.
///
/// Strings are unquoted on the wire (`selected_size=eq.M`), and the empty
/// string is a legal literal - the canonical "no variant selected" value.
fn filter_literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl TabularStore for RestStore {
    #[instrument(skip(self, query), fields(table = table))]
    async fn select(&self, table: &str, query: Query) -> Result<Vec<Value>, StoreError> {
        let params = Self::query_params(&query);
        debug!(?params, "select");

        let response = self
            .authed(self.inner.client.get(self.table_url(table)))
            .query(&params)
            .send()
            .await?;
        Self::read_rows(response).await
    }

    #[instrument(skip(self, row), fields(table = table))]
    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        let response = self
            .authed(self.inner.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&Value::Array(vec![row]))
            .send()
            .await?;

        let mut rows = Self::read_rows(response).await?;
        if rows.is_empty() {
            return Err(StoreError::RowNotFound);
        }
        Ok(rows.remove(0))
    }

    #[instrument(skip(self, patch, filters), fields(table = table))]
    async fn update(
        &self,
        table: &str,
        patch: Value,
        filters: Vec<Filter>,
    ) -> Result<Value, StoreError> {
        let params = Self::filter_params(&filters);

        let response = self
            .authed(self.inner.client.patch(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(&params)
            .json(&patch)
            .send()
            .await?;

        let mut rows = Self::read_rows(response).await?;
        if rows.is_empty() {
            // Nothing matched the filters (e.g. a stale row id).
            return Err(StoreError::RowNotFound);
        }
        Ok(rows.remove(0))
    }

    #[instrument(skip(self, filters), fields(table = table))]
    async fn delete(&self, table: &str, filters: Vec<Filter>) -> Result<(), StoreError> {
        let params = Self::filter_params(&filters);

        let response = self
            .authed(self.inner.client.delete(self.table_url(table)))
            .query(&params)
            .send()
            .await?;

        Self::read_body(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_literal_shapes() {
        assert_eq!(filter_literal(&json!("M")), "M");
        assert_eq!(filter_literal(&json!("")), "");
        assert_eq!(filter_literal(&json!(true)), "true");
        assert_eq!(filter_literal(&json!(8)), "8");
    }

    #[test]
    fn test_query_params_rendering() {
        let query = Query::new()
            .eq("category", "men")
            .eq("in_stock", true)
            .order_asc("sort_order")
            .limit(8);

        let params = RestStore::query_params(&query);
        assert_eq!(
            params,
            vec![
                ("category".to_owned(), "eq.men".to_owned()),
                ("in_stock".to_owned(), "eq.true".to_owned()),
                ("order".to_owned(), "sort_order.asc".to_owned()),
                ("limit".to_owned(), "8".to_owned()),
            ]
        );
    }
}
