//! Remote tabular store client.
//!
//! All persistence is delegated to a hosted data service exposing a generic
//! tabular query interface (filter, order, limit, insert, update, delete).
//! The [`TabularStore`] trait captures exactly the slice of that interface the
//! storefront consumes; [`RestStore`] speaks the hosted service's REST
//! protocol, while [`MemoryStore`] backs tests.
//!
//! The store is treated as the sole source of truth: there is no retry, no
//! backoff, and no internal recovery. A failed query surfaces as a
//! [`StoreError`] to the caller. An empty result is absence, not an error.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when talking to the remote store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store API returned a non-success status.
    #[error("store API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A `single()`-shaped query matched no rows.
    #[error("expected exactly one row, found none")]
    RowNotFound,

    /// A `single()`/`maybe_single()`-shaped query matched more than one row.
    #[error("expected at most one row, found {0}")]
    MultipleRows(usize),
}

/// An equality filter on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    /// Build a `column = value` filter.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Sort direction for an ordered select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A select query: equality filters, optional ordering, optional row limit.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<(String, Direction)>,
    pub limit: Option<u32>,
}

impl Query {
    /// Start an empty query (all rows of the table).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `column = value` filter.
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    /// Order ascending by `column`.
    #[must_use]
    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order = Some((column.into(), Direction::Ascending));
        self
    }

    /// Order descending by `column`.
    #[must_use]
    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order = Some((column.into(), Direction::Descending));
        self
    }

    /// Cap the number of returned rows.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// The generic tabular query interface consumed by the storefront.
///
/// Rows travel as raw JSON objects; typed models deserialize at the service
/// layer. Implementations must not retry failed operations.
pub trait TabularStore: Send + Sync {
    /// Fetch all rows matching `query`.
    fn select(
        &self,
        table: &str,
        query: Query,
    ) -> impl Future<Output = Result<Vec<Value>, StoreError>> + Send;

    /// Insert one row, returning it with server-assigned fields
    /// (id, `created_at`).
    fn insert(
        &self,
        table: &str,
        row: Value,
    ) -> impl Future<Output = Result<Value, StoreError>> + Send;

    /// Apply `patch` to every row matching `filters`, returning the first
    /// updated row. Fails with [`StoreError::RowNotFound`] when nothing
    /// matched.
    fn update(
        &self,
        table: &str,
        patch: Value,
        filters: Vec<Filter>,
    ) -> impl Future<Output = Result<Value, StoreError>> + Send;

    /// Delete every row matching `filters`. Deleting nothing is not an error.
    fn delete(
        &self,
        table: &str,
        filters: Vec<Filter>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// `single()` result shape: exactly one matching row.
    fn select_single(
        &self,
        table: &str,
        query: Query,
    ) -> impl Future<Output = Result<Value, StoreError>> + Send
    where
        Self: Sized,
    {
        async move {
            let mut rows = self.select(table, query).await?;
            match rows.len() {
                0 => Err(StoreError::RowNotFound),
                1 => Ok(rows.remove(0)),
                n => Err(StoreError::MultipleRows(n)),
            }
        }
    }

    /// `maybe_single()` result shape: zero rows is `None`, more than one row
    /// is an error.
    fn select_maybe_single(
        &self,
        table: &str,
        query: Query,
    ) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send
    where
        Self: Sized,
    {
        async move {
            let mut rows = self.select(table, query).await?;
            match rows.len() {
                0 => Ok(None),
                1 => Ok(Some(rows.remove(0))),
                n => Err(StoreError::MultipleRows(n)),
            }
        }
    }
}
