//! In-memory table client
//!
//! Holds tables as JSON rows behind a mutex. Used by tests and the demo
//! mode of the terminal front-end. Supports failure injection per table and
//! operation, and records every call.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use shared::{Filter, TableQuery};
use uuid::Uuid;

use super::TableClient;
use crate::error::{ClientError, ClientResult};

/// Operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableOp {
    Select,
    Insert,
    Update,
}

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCall {
    pub op: TableOp,
    pub table: String,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, Vec<Value>>,
    failures: HashSet<(TableOp, String)>,
    calls: Vec<TableCall>,
}

/// In-process table client
#[derive(Default)]
pub struct MemoryTableClient {
    inner: Mutex<Inner>,
}

impl MemoryTableClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows to a table, creating it if needed
    pub fn seed<I>(&self, table: &str, rows: I)
    where
        I: IntoIterator<Item = Value>,
    {
        self.inner
            .lock()
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    /// Make every `op` on `table` fail until [`Self::clear_failures`]
    pub fn fail(&self, op: TableOp, table: &str) {
        self.inner.lock().failures.insert((op, table.to_string()));
    }

    pub fn clear_failures(&self) {
        self.inner.lock().failures.clear();
    }

    /// Snapshot of a table's rows
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.inner
            .lock()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Calls recorded so far
    pub fn calls(&self) -> Vec<TableCall> {
        self.inner.lock().calls.clone()
    }

    /// Number of recorded calls of one kind
    pub fn count(&self, op: TableOp) -> usize {
        self.inner.lock().calls.iter().filter(|c| c.op == op).count()
    }

    fn record(inner: &mut Inner, op: TableOp, table: &str) -> ClientResult<()> {
        inner.calls.push(TableCall {
            op,
            table: table.to_string(),
        });
        if inner.failures.contains(&(op, table.to_string())) {
            return Err(ClientError::Api {
                code: "PGRST000".into(),
                message: format!("simulated {op:?} failure on {table}"),
                details: None,
                hint: None,
            });
        }
        Ok(())
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        // nulls last, as the database sorts ascending
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

fn project(row: &Value, columns: &[&str]) -> Value {
    let mut out = Map::new();
    for column in columns {
        if let Some(value) = row.get(*column) {
            out.insert((*column).to_string(), value.clone());
        }
    }
    Value::Object(out)
}

#[async_trait]
impl TableClient for MemoryTableClient {
    async fn select(&self, query: &TableQuery) -> ClientResult<Vec<Value>> {
        let mut inner = self.inner.lock();
        Self::record(&mut inner, TableOp::Select, &query.table)?;

        let mut rows: Vec<Value> = inner
            .tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| f.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(field) = &query.order_by {
            rows.sort_by(|a, b| compare(a.get(field), b.get(field)));
        }
        if let Some(columns) = query.column_list() {
            rows = rows.iter().map(|row| project(row, &columns)).collect();
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Value) -> ClientResult<()> {
        let mut inner = self.inner.lock();
        Self::record(&mut inner, TableOp::Insert, table)?;

        let object = row
            .as_object_mut()
            .ok_or_else(|| ClientError::Validation("row must be a JSON object".into()))?;
        // database default for the primary key
        object
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));

        inner.tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    async fn update(&self, table: &str, values: Value, filters: &[Filter]) -> ClientResult<()> {
        let mut inner = self.inner.lock();
        Self::record(&mut inner, TableOp::Update, table)?;

        let values = values
            .as_object()
            .ok_or_else(|| ClientError::Validation("update values must be a JSON object".into()))?
            .clone();

        if let Some(rows) = inner.tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| filters.iter().all(|f| f.matches(row))) {
                if let Some(object) = row.as_object_mut() {
                    for (key, value) in &values {
                        object.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_select_filters_orders_and_projects() {
        let backend = MemoryTableClient::new();
        backend.seed(
            "rooms",
            vec![
                json!({"id": "2", "name": "Lab B", "location": "North", "is_available": true}),
                json!({"id": "1", "name": "Auditorium", "location": "Main", "is_available": true}),
                json!({"id": "3", "name": "Closed Lab", "location": "South", "is_available": false}),
            ],
        );

        let query = TableQuery::all("rooms")
            .columns("name")
            .eq("is_available", true)
            .order_by("name");
        let rows = backend.select(&query).await.unwrap();

        assert_eq!(rows, vec![json!({"name": "Auditorium"}), json!({"name": "Lab B"})]);
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_update_matches() {
        let backend = MemoryTableClient::new();
        backend
            .insert("reservations", json!({"status": "pending"}))
            .await
            .unwrap();

        let id = backend.rows("reservations")[0]["id"].as_str().unwrap().to_string();
        backend
            .update(
                "reservations",
                json!({"status": "cancelled"}),
                &[Filter::eq("id", &id)],
            )
            .await
            .unwrap();

        assert_eq!(backend.rows("reservations")[0]["status"], "cancelled");
        assert_eq!(backend.count(TableOp::Insert), 1);
        assert_eq!(backend.count(TableOp::Update), 1);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let backend = MemoryTableClient::new();
        backend.fail(TableOp::Insert, "reservations");

        let result = backend.insert("reservations", json!({})).await;
        assert!(matches!(result, Err(ClientError::Api { .. })));
        assert!(backend.rows("reservations").is_empty());

        backend.clear_failures();
        assert!(backend.insert("reservations", json!({})).await.is_ok());
    }
}
