//! In-process gateway.
//!
//! Holds every collection as a list of JSON objects and evaluates [`Query`]
//! the way PostgREST does for the subset of operators the app uses. Backs the
//! `--fixtures` offline mode and the test suite.

use super::query::{Filter, Query};
use super::{DataGateway, JsonRow, RowPage, strip_server_keys};
use crate::error::{PickerError, Result};
use crate::types::Collection;
use anyhow::Context;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Default)]
pub struct MemoryGateway {
    tables: Mutex<BTreeMap<Collection, Vec<JsonRow>>>,
    requests: AtomicUsize,
    failure: Mutex<Option<String>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a snapshot object `{ "<collection>": [rows...] }`.
    pub fn from_snapshot(snapshot: &Value) -> Result<Self> {
        let object = snapshot
            .as_object()
            .ok_or_else(|| PickerError::config("fixture snapshot must be a JSON object"))?;

        let gateway = Self::new();
        for (name, rows) in object {
            let collection = Collection::from_str(name)
                .map_err(|_| PickerError::config(format!("unknown collection '{}'", name)))?;
            let rows = rows.as_array().ok_or_else(|| {
                PickerError::config(format!("fixture '{}' must be an array of rows", name))
            })?;
            let rows = rows
                .iter()
                .map(|row| {
                    row.as_object().cloned().ok_or_else(|| {
                        PickerError::config(format!("fixture '{}' contains a non-object row", name))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            gateway.seed(collection, rows);
        }
        Ok(gateway)
    }

    /// Load a snapshot from a JSON file.
    pub fn from_snapshot_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixtures: {}", path.display()))?;
        let snapshot: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse fixtures: {}", path.display()))?;
        let gateway = Self::from_snapshot(&snapshot)
            .with_context(|| format!("Invalid fixtures: {}", path.display()))?;
        info!("Loaded fixtures from {}", path.display());
        Ok(gateway)
    }

    /// Replace the contents of one collection.
    pub fn seed(&self, collection: Collection, rows: Vec<JsonRow>) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.insert(collection, rows);
        }
    }

    /// Number of gateway calls served so far, failed ones included.
    pub fn request_count(&self) -> usize {
        self.requests.load(AtomicOrdering::SeqCst)
    }

    /// Make every following call fail with a transport error, or recover with `None`.
    pub fn set_failure(&self, message: Option<&str>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = message.map(str::to_string);
        }
    }

    fn begin(&self) -> Result<MutexGuard<'_, BTreeMap<Collection, Vec<JsonRow>>>> {
        self.requests.fetch_add(1, AtomicOrdering::SeqCst);
        let failure = self
            .failure
            .lock()
            .map_err(|e| PickerError::state(format!("failure lock poisoned: {}", e)))?
            .clone();
        if let Some(message) = failure {
            return Err(PickerError::transport(message));
        }
        self.tables
            .lock()
            .map_err(|e| PickerError::state(format!("table lock poisoned: {}", e)))
    }
}

fn row_id(row: &JsonRow) -> Option<i64> {
    row.get("id").and_then(Value::as_i64)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn matches_filter(row: &JsonRow, filter: &Filter) -> bool {
    match filter {
        Filter::Eq { column, value } => match row.get(column) {
            // Arrays never equal a scalar, as in PostgREST
            Some(Value::Array(_)) | None => false,
            Some(cell) => scalar_text(cell).as_deref() == Some(value.as_str()),
        },
        Filter::ILike { column, term } => row
            .get(column)
            .and_then(scalar_text)
            .is_some_and(|text| text.to_lowercase().contains(&term.to_lowercase())),
    }
}

/// Compare two cells; nulls and missing cells sort last in either direction.
fn compare_cells(a: Option<&Value>, b: Option<&Value>, ascending: bool) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    let ordering = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => scalar_text(x).cmp(&scalar_text(y)),
    };
    if ascending { ordering } else { ordering.reverse() }
}

fn project(row: &JsonRow, columns: Option<&str>) -> Value {
    match columns.map(str::trim) {
        None | Some("*") | Some("") => Value::Object(row.clone()),
        Some(list) => {
            let wanted: Vec<&str> = list.split(',').map(str::trim).collect();
            Value::Object(
                row.iter()
                    .filter(|(key, _)| wanted.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            )
        }
    }
}

impl DataGateway for MemoryGateway {
    fn select(&self, collection: Collection, query: &Query) -> Result<RowPage> {
        let tables = self.begin()?;
        let mut rows: Vec<&JsonRow> = tables
            .get(&collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| matches_filter(row, f)))
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                compare_cells(a.get(&order.column), b.get(&order.column), order.ascending)
            });
        }

        let total = rows.len();
        let window: Vec<&JsonRow> = match query.range {
            Some(range) => rows
                .into_iter()
                .skip(range.from)
                .take(range.len())
                .collect(),
            None => rows,
        };

        debug!("memory select {} -> {} of {}", collection, window.len(), total);
        Ok(RowPage {
            rows: window
                .into_iter()
                .map(|row| project(row, query.columns.as_deref()))
                .collect(),
            total: query.count.then_some(total),
        })
    }

    fn insert(&self, collection: Collection, row: &JsonRow) -> Result<Value> {
        let mut tables = self.begin()?;
        let rows = tables.entry(collection).or_default();
        let next_id = rows.iter().filter_map(row_id).max().unwrap_or(0) + 1;

        let mut stored = strip_server_keys(row);
        stored.insert("id".to_string(), Value::from(next_id));
        rows.push(stored.clone());
        Ok(Value::Object(stored))
    }

    fn update(&self, collection: Collection, id: i64, patch: &JsonRow) -> Result<Value> {
        let mut tables = self.begin()?;
        let row = tables
            .get_mut(&collection)
            .and_then(|rows| rows.iter_mut().find(|row| row_id(row) == Some(id)))
            .ok_or_else(|| PickerError::api(404, format!("No {} row with id {}", collection, id)))?;

        for (key, value) in strip_server_keys(patch) {
            row.insert(key, value);
        }
        Ok(Value::Object(row.clone()))
    }

    fn delete(&self, collection: Collection, id: i64) -> Result<()> {
        let mut tables = self.begin()?;
        if let Some(rows) = tables.get_mut(&collection) {
            rows.retain(|row| row_id(row) != Some(id));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
