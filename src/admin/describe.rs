//! Entity descriptors for the admin table.
//!
//! [`Describable`] tells the generic table which columns an entity has, how
//! to render a cell, which fields the add form offers and how form input is
//! validated and converted into a backend payload.

use crate::error::{PickerError, Result};
use crate::gateway::JsonRow;
use crate::model::{CpuRow, GpuRow, LaptopRow, ProgramRow};
use crate::types::{AdminTab, Collection};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

// ============================================================================
// Columns, fields and cells
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: String,
    pub label: String,
}

impl ColumnSpec {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }

    pub fn is_id(&self) -> bool {
        self.key == "id"
    }
}

/// Reference list a select field picks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionSource {
    Cpus,
    Gpus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    /// Id chosen from a searchable option list.
    Select(OptionSource),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text,
            required: false,
        }
    }

    pub const fn number(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Number,
            required: false,
        }
    }

    pub const fn select(key: &'static str, label: &'static str, source: OptionSource) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Select(source),
            required: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A rendered table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Number(f64),
    Text(String),
    /// Lists and objects, shown as JSON text.
    Json(String),
    Bool(bool),
}

impl CellValue {
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Null,
            Some(Value::Number(n)) => n.as_f64().map(Self::Number).unwrap_or(Self::Null),
            Some(Value::String(s)) => Self::Text(s.clone()),
            Some(Value::Bool(b)) => Self::Bool(*b),
            Some(other) => Self::Json(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Compare two cells; `Null` sorts after everything in either direction,
    /// so callers must not reverse the result for nulls.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) | Self::Json(s) => write!(f, "{}", s),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Columns from a row's keys, `id` first and the rest in key order.
pub fn infer_columns(row: &Value) -> Vec<ColumnSpec> {
    let Some(object) = row.as_object() else {
        return Vec::new();
    };
    let mut keys: Vec<&String> = object.keys().collect();
    keys.sort_by_key(|key| key.as_str() != "id");
    keys.into_iter()
        .map(|key| ColumnSpec::new(key, key))
        .collect()
}

// ============================================================================
// Describable
// ============================================================================

/// An entity the admin table can list, add, edit and delete.
pub trait Describable: Serialize + DeserializeOwned + Clone + Send + 'static {
    const COLLECTION: Collection;
    const TAB: AdminTab;

    /// Configured columns; an empty list means "infer from the first row".
    fn columns() -> Vec<ColumnSpec> {
        Vec::new()
    }

    /// Fields of the add form.
    fn fields() -> Vec<FieldSpec>;

    fn id(&self) -> Option<i64>;

    fn name(&self) -> &str;

    /// Row as JSON; `Null` (every cell empty) if it cannot be serialized.
    fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            warn!("Failed to serialize {} row {:?}: {}", Self::COLLECTION, self.id(), e);
            Value::Null
        })
    }

    fn cell(&self, key: &str) -> CellValue {
        CellValue::from_json(self.to_json().get(key))
    }

    /// Validate add-form input and convert it into an insert payload.
    fn build_payload(input: &BTreeMap<String, String>) -> Result<JsonRow> {
        build_payload(&Self::fields(), input)
    }
}

/// Shared add-form validation: at least one value, required fields present,
/// numeric fields parsed (empty becomes null).
pub fn build_payload(fields: &[FieldSpec], input: &BTreeMap<String, String>) -> Result<JsonRow> {
    let value_of = |key: &str| input.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if fields.iter().all(|field| value_of(field.key).is_none()) {
        return Err(PickerError::validation("Please enter at least one value"));
    }

    let missing: Vec<&str> = fields
        .iter()
        .filter(|field| field.required && value_of(field.key).is_none())
        .map(|field| field.label)
        .collect();
    if !missing.is_empty() {
        return Err(PickerError::validation(format!(
            "Required: {}",
            missing.join(", ")
        )));
    }

    let mut payload = JsonRow::new();
    for field in fields {
        let value = match (field.kind, value_of(field.key)) {
            (_, None) => Value::Null,
            (FieldKind::Text, Some(text)) => Value::String(text.to_string()),
            (FieldKind::Number | FieldKind::Select(_), Some(text)) => {
                parse_number(text).ok_or_else(|| {
                    PickerError::validation(format!("{} must be a number", field.label))
                })?
            }
        };
        payload.insert(field.key.to_string(), value);
    }
    Ok(payload)
}

/// Parse user input as a JSON number, integral when possible.
pub fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(int) = text.parse::<i64>() {
        return Some(Value::from(int));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

// ============================================================================
// Entities
// ============================================================================

impl Describable for CpuRow {
    const COLLECTION: Collection = Collection::Cpus;
    const TAB: AdminTab = AdminTab::Cpus;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("id", "ID"),
            ColumnSpec::new("name", "Name"),
            ColumnSpec::new("benchmark_cpu", "Benchmark"),
            ColumnSpec::new("integrated_gpu_id", "Integrated GPU"),
            ColumnSpec::new("rank_cpu", "Rank"),
        ]
    }

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("name", "Name").required(),
            FieldSpec::number("benchmark_cpu", "Benchmark"),
            FieldSpec::select("integrated_gpu_id", "Integrated GPU", OptionSource::Gpus),
            FieldSpec::number("rank_cpu", "Rank"),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Describable for GpuRow {
    const COLLECTION: Collection = Collection::Gpus;
    const TAB: AdminTab = AdminTab::Gpus;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("id", "ID"),
            ColumnSpec::new("name", "Name"),
            ColumnSpec::new("benchmark_gpu", "Benchmark"),
            ColumnSpec::new("rank_gpu", "Rank"),
        ]
    }

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("name", "Name").required(),
            FieldSpec::number("benchmark_gpu", "Benchmark"),
            FieldSpec::number("rank_gpu", "Rank"),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Describable for ProgramRow {
    const COLLECTION: Collection = Collection::Programs;
    const TAB: AdminTab = AdminTab::Programs;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("id", "ID"),
            ColumnSpec::new("name", "Name"),
            ColumnSpec::new("version", "Version"),
            ColumnSpec::new("category", "Category"),
            ColumnSpec::new("cpu_min", "Min CPU"),
            ColumnSpec::new("cpu_rec", "Rec. CPU"),
            ColumnSpec::new("gpu_min", "Min GPU"),
            ColumnSpec::new("gpu_rec", "Rec. GPU"),
            ColumnSpec::new("ram_min_gb", "Min RAM (GB)"),
            ColumnSpec::new("ram_rec_gb", "Rec. RAM (GB)"),
        ]
    }

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("name", "Name").required(),
            FieldSpec::text("version", "Version"),
            FieldSpec::text("category", "Category"),
            FieldSpec::select("cpu_min", "Min CPU", OptionSource::Cpus),
            FieldSpec::select("cpu_rec", "Rec. CPU", OptionSource::Cpus),
            FieldSpec::select("gpu_min", "Min GPU", OptionSource::Gpus),
            FieldSpec::select("gpu_rec", "Rec. GPU", OptionSource::Gpus),
            FieldSpec::number("ram_min_gb", "Min RAM (GB)"),
            FieldSpec::number("ram_rec_gb", "Rec. RAM (GB)"),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Describable for LaptopRow {
    const COLLECTION: Collection = Collection::Laptops;
    const TAB: AdminTab = AdminTab::Laptops;

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("name", "Name").required(),
            FieldSpec::text("url", "URL").required(),
            FieldSpec::select("cpu_min", "CPU", OptionSource::Cpus),
            FieldSpec::select("gpu_min", "GPU", OptionSource::Gpus),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
