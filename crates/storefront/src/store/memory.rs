//! In-process table store.
//!
//! Backs unit and integration tests with the same row semantics the REST
//! backend exhibits: server-assigned
//! `id` and `created_at` on insert, equality filters, orderable selects.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::{Direction, Filter, Query, StoreError, TabularStore};

/// In-memory implementation of [`TabularStore`].
///
/// Cheaply cloneable; clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently in `table`.
    ///
    /// # Panics
    ///
    /// Panics if the table lock is poisoned.
    #[must_use]
    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .lock()
            .expect("table lock poisoned")
            .get(table)
            .map_or(0, Vec::len)
    }
}

/// Does `row` satisfy every equality filter?
///
/// A missing column is treated as JSON null, matching how the remote store
/// surfaces unset columns.
fn matches(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|f| {
        let cell = row.get(&f.column).cloned().unwrap_or(Value::Null);
        cell == f.value
    })
}

fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

impl TabularStore for MemoryStore {
    async fn select(&self, table: &str, query: Query) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.lock().expect("table lock poisoned");
        let mut rows: Vec<Value> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some((column, direction)) = &query.order {
            rows.sort_by(|a, b| {
                let (a, b) = (
                    a.get(column).cloned().unwrap_or(Value::Null),
                    b.get(column).cloned().unwrap_or(Value::Null),
                );
                let ordering = compare_cells(&a, &b);
                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Value) -> Result<Value, StoreError> {
        let Some(object) = row.as_object_mut() else {
            return Err(StoreError::Json(serde_json::Error::io(
                std::io::Error::other("inserted row must be a JSON object"),
            )));
        };

        object
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        object
            .entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

        let mut tables = self.tables.lock().expect("table lock poisoned");
        tables.entry(table.to_owned()).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: &str,
        patch: Value,
        filters: Vec<Filter>,
    ) -> Result<Value, StoreError> {
        let Some(patch) = patch.as_object() else {
            return Err(StoreError::Json(serde_json::Error::io(
                std::io::Error::other("patch must be a JSON object"),
            )));
        };

        let mut tables = self.tables.lock().expect("table lock poisoned");
        let rows = tables.entry(table.to_owned()).or_default();

        let mut first_updated = None;
        for row in rows.iter_mut().filter(|row| matches(row, &filters)) {
            if let Some(object) = row.as_object_mut() {
                for (key, value) in patch {
                    object.insert(key.clone(), value.clone());
                }
            }
            if first_updated.is_none() {
                first_updated = Some(row.clone());
            }
        }

        first_updated.ok_or(StoreError::RowNotFound)
    }

    async fn delete(&self, table: &str, filters: Vec<Filter>) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().expect("table lock poisoned");
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| !matches(row, &filters));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamp() {
        let store = MemoryStore::new();
        let row = store
            .insert("products", json!({"name": "Linen Shirt"}))
            .await
            .expect("insert");

        assert!(row["id"].is_string());
        assert!(row["created_at"].is_string());
        assert_eq!(store.row_count("products"), 1);
    }

    #[tokio::test]
    async fn test_select_filters_order_and_limit() {
        let store = MemoryStore::new();
        for (name, order, in_stock) in [("a", 3, true), ("b", 1, true), ("c", 2, false)] {
            store
                .insert(
                    "products",
                    json!({"name": name, "sort_order": order, "in_stock": in_stock}),
                )
                .await
                .expect("insert");
        }

        let rows = store
            .select(
                "products",
                Query::new().eq("in_stock", true).order_asc("sort_order").limit(1),
            )
            .await
            .expect("select");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "b");
    }

    #[tokio::test]
    async fn test_update_patches_matching_rows() {
        let store = MemoryStore::new();
        let row = store
            .insert("cart_items", json!({"quantity": 1}))
            .await
            .expect("insert");

        let updated = store
            .update(
                "cart_items",
                json!({"quantity": 5}),
                vec![Filter::eq("id", row["id"].clone())],
            )
            .await
            .expect("update");

        assert_eq!(updated["quantity"], 5);
    }

    #[tokio::test]
    async fn test_update_unknown_row_is_row_not_found() {
        let store = MemoryStore::new();
        let result = store
            .update(
                "cart_items",
                json!({"quantity": 5}),
                vec![Filter::eq("id", "missing")],
            )
            .await;
        assert!(matches!(result, Err(StoreError::RowNotFound)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        let row = store
            .insert("cart_items", json!({"quantity": 1}))
            .await
            .expect("insert");

        let filters = vec![Filter::eq("id", row["id"].clone())];
        store
            .delete("cart_items", filters.clone())
            .await
            .expect("first delete");
        store
            .delete("cart_items", filters)
            .await
            .expect("second delete of a missing row still succeeds");
        assert_eq!(store.row_count("cart_items"), 0);
    }

    #[tokio::test]
    async fn test_missing_column_matches_null() {
        let store = MemoryStore::new();
        store
            .insert("cart_items", json!({"quantity": 1}))
            .await
            .expect("insert");

        let rows = store
            .select(
                "cart_items",
                Query::new().eq("selected_size", Value::Null),
            )
            .await
            .expect("select");
        assert_eq!(rows.len(), 1);
    }
}
