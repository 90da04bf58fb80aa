//! Remote data gateway
//!
//! The [`DataGateway`] trait is the only way the rest of the crate talks to
//! the backend. Two implementations exist:
//! - [`RestGateway`] - blocking PostgREST client for the hosted database
//! - [`MemoryGateway`] - in-process tables, used offline (`--fixtures`) and in tests
//!
//! Rows cross the trait as JSON objects; [`crate::repository::Repository`]
//! decodes them into the typed rows of [`crate::model`].

mod memory;
mod query;
mod rest;

pub use memory::MemoryGateway;
pub use query::{Filter, Order, Query, RowRange, parse_content_range_total};
pub use rest::{RestGateway, RestGatewayConfig};

use crate::error::{PickerError, Result};
use crate::types::Collection;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A JSON object as sent to or received from the backend.
pub type JsonRow = Map<String, Value>;

/// Rows returned by a select, with the exact total when one was requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowPage {
    pub rows: Vec<Value>,
    pub total: Option<usize>,
}

/// Read/write access to the backend collections.
///
/// Every call either succeeds or returns the transport's error; nothing is
/// retried and nothing is cached.
pub trait DataGateway: Send + Sync {
    /// Select rows from a table or view.
    fn select(&self, collection: Collection, query: &Query) -> Result<RowPage>;

    /// Insert one row and return it as persisted (with its assigned id).
    fn insert(&self, collection: Collection, row: &JsonRow) -> Result<Value>;

    /// Apply a partial update to the row with `id` and return the updated row.
    fn update(&self, collection: Collection, id: i64, patch: &JsonRow) -> Result<Value>;

    /// Delete the row with `id`.
    fn delete(&self, collection: Collection, id: i64) -> Result<()>;

    /// Short name for logs and the status bar.
    fn name(&self) -> &'static str;
}

/// Decode a page of JSON rows into typed rows.
pub fn decode_rows<T: DeserializeOwned>(collection: Collection, rows: Vec<Value>) -> Result<Vec<T>> {
    rows.into_iter()
        .map(|row| decode_row(collection, row))
        .collect()
}

/// Decode a single JSON row.
pub fn decode_row<T: DeserializeOwned>(collection: Collection, row: Value) -> Result<T> {
    serde_json::from_value(row)
        .map_err(|e| PickerError::decode(format!("{} row: {}", collection, e)))
}

/// Keys the backend assigns itself and which are never written by clients.
pub const SERVER_ASSIGNED_KEYS: [&str; 2] = ["id", "created_at"];

/// Copy of `row` without server-assigned keys.
pub fn strip_server_keys(row: &JsonRow) -> JsonRow {
    row.iter()
        .filter(|(key, _)| !SERVER_ASSIGNED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
