//! Backend collaborator
//!
//! The hosted data service is consumed through three operation shapes
//! only: `select` rows (equality filters, ascending order), `insert` one
//! row, and `update` fields of rows matching equality filters.
//!
//! - [`RestTableClient`]: HTTP implementation against the hosted service
//! - [`MemoryTableClient`]: in-process tables for tests and demos

mod memory;
mod rest;

pub use memory::{MemoryTableClient, TableCall, TableOp};
pub use rest::RestTableClient;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{Filter, TableQuery};

use crate::error::{ClientError, ClientResult};

/// Generic table-oriented client
#[async_trait]
pub trait TableClient: Send + Sync {
    /// Fetch rows matching the query
    async fn select(&self, query: &TableQuery) -> ClientResult<Vec<Value>>;

    /// Insert one row
    async fn insert(&self, table: &str, row: Value) -> ClientResult<()>;

    /// Set `values` on every row matching all `filters`
    async fn update(&self, table: &str, values: Value, filters: &[Filter]) -> ClientResult<()>;
}

/// Select and decode rows into `T`
pub async fn select_rows<T: DeserializeOwned>(
    backend: &dyn TableClient,
    query: &TableQuery,
) -> ClientResult<Vec<T>> {
    backend
        .select(query)
        .await?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(ClientError::from))
        .collect()
}

/// Select exactly one row and decode it into `T`
pub async fn select_single<T: DeserializeOwned>(
    backend: &dyn TableClient,
    query: &TableQuery,
) -> ClientResult<T> {
    let mut rows = backend.select(query).await?;
    match rows.len() {
        1 => Ok(serde_json::from_value(rows.remove(0))?),
        0 => Err(ClientError::NotFound(format!("no row in {}", query.table))),
        n => Err(ClientError::InvalidResponse(format!(
            "expected one row in {}, got {n}",
            query.table
        ))),
    }
}
