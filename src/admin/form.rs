//! Add and edit forms of the admin table.

use super::describe::{CellValue, ColumnSpec, FieldKind, FieldSpec, OptionSource, parse_number};
use crate::error::{PickerError, Result};
use crate::gateway::{JsonRow, SERVER_ASSIGNED_KEYS};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

/// Characters needed before a select filter shows matches.
pub const MIN_FILTER_CHARS: usize = 2;

// ============================================================================
// Select filter
// ============================================================================

/// One choice of a select field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub id: i64,
    pub name: String,
}

/// Debounced, case-insensitive filter over a select field's options.
///
/// Typing updates `input` immediately; the match list follows once no key
/// has been pressed for `debounce`.
#[derive(Debug, Clone)]
pub struct SelectFilter {
    input: String,
    applied: String,
    last_edit: Option<Instant>,
    debounce: Duration,
}

impl SelectFilter {
    pub fn new(debounce: Duration) -> Self {
        Self {
            input: String::new(),
            applied: String::new(),
            last_edit: None,
            debounce,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push(&mut self, c: char, now: Instant) {
        self.input.push(c);
        self.last_edit = Some(now);
    }

    pub fn pop(&mut self, now: Instant) {
        self.input.pop();
        self.last_edit = Some(now);
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.applied.clear();
        self.last_edit = None;
    }

    /// Apply the pending input once the debounce window has passed.
    /// Returns whether the match list changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.last_edit {
            Some(at) if now.duration_since(at) >= self.debounce => {
                self.last_edit = None;
                if self.applied != self.input {
                    self.applied = self.input.clone();
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// Whether the match list is showing (applied input long enough).
    pub fn is_open(&self) -> bool {
        self.applied.chars().count() >= MIN_FILTER_CHARS
    }

    pub fn matches<'a>(&self, options: &'a [SelectOption]) -> Vec<&'a SelectOption> {
        if !self.is_open() {
            return Vec::new();
        }
        let needle = self.applied.to_lowercase();
        options
            .iter()
            .filter(|option| option.name.to_lowercase().contains(&needle))
            .collect()
    }
}

// ============================================================================
// Add form
// ============================================================================

/// Single-row add form.
#[derive(Debug, Clone)]
pub struct AddForm {
    pub fields: Vec<FieldSpec>,
    pub values: BTreeMap<String, String>,
    pub focus: usize,
    /// Highlighted match of the focused select field.
    pub option_cursor: usize,
    filters: HashMap<&'static str, SelectFilter>,
}

impl AddForm {
    pub fn new(fields: Vec<FieldSpec>, debounce: Duration) -> Self {
        let filters = fields
            .iter()
            .filter(|field| matches!(field.kind, FieldKind::Select(_)))
            .map(|field| (field.key, SelectFilter::new(debounce)))
            .collect();
        Self {
            fields,
            values: BTreeMap::new(),
            focus: 0,
            option_cursor: 0,
            filters,
        }
    }

    pub fn focused(&self) -> Option<&FieldSpec> {
        self.fields.get(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
            self.option_cursor = 0;
        }
    }

    pub fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
            self.option_cursor = 0;
        }
    }

    pub fn filter(&self, key: &str) -> Option<&SelectFilter> {
        self.filters.get(key)
    }

    /// Type into the focused field; select fields type into their filter.
    pub fn type_char(&mut self, c: char, now: Instant) {
        let Some(field) = self.fields.get(self.focus) else {
            return;
        };
        if let Some(filter) = self.filters.get_mut(field.key) {
            filter.push(c, now);
            self.option_cursor = 0;
        } else {
            self.values.entry(field.key.to_string()).or_default().push(c);
        }
    }

    pub fn backspace(&mut self, now: Instant) {
        let Some(field) = self.fields.get(self.focus) else {
            return;
        };
        if let Some(filter) = self.filters.get_mut(field.key) {
            if filter.input().is_empty() {
                self.values.remove(field.key);
            } else {
                filter.pop(now);
            }
        } else if let Some(value) = self.values.get_mut(field.key) {
            value.pop();
        }
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for filter in self.filters.values_mut() {
            changed |= filter.tick(now);
        }
        changed
    }

    /// Matches of the focused select field, if it is one.
    pub fn focused_matches<'a>(
        &self,
        options: &'a HashMap<OptionSource, Vec<SelectOption>>,
    ) -> Vec<&'a SelectOption> {
        let Some(field) = self.focused() else {
            return Vec::new();
        };
        match (field.kind, self.filters.get(field.key)) {
            (FieldKind::Select(source), Some(filter)) => options
                .get(&source)
                .map(|list| filter.matches(list))
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Move the dropdown highlight, staying within the current matches.
    pub fn move_option(&mut self, delta: isize, options: &HashMap<OptionSource, Vec<SelectOption>>) {
        let len = self.focused_matches(options).len();
        self.option_cursor = match len {
            0 => 0,
            _ => self.option_cursor.saturating_add_signed(delta).min(len - 1),
        };
    }

    /// Store the highlighted match as the focused select field's value.
    pub fn pick_option(&mut self, options: &HashMap<OptionSource, Vec<SelectOption>>) -> bool {
        let picked = self
            .focused_matches(options)
            .get(self.option_cursor)
            .map(|option| option.id);
        let (Some(id), Some(field)) = (picked, self.fields.get(self.focus)) else {
            return false;
        };
        let key = field.key;
        self.values.insert(key.to_string(), id.to_string());
        if let Some(filter) = self.filters.get_mut(key) {
            filter.clear();
        }
        self.option_cursor = 0;
        true
    }

    pub fn clear(&mut self) {
        self.values.clear();
        for filter in self.filters.values_mut() {
            filter.clear();
        }
        self.focus = 0;
        self.option_cursor = 0;
    }
}

// ============================================================================
// Inline edit
// ============================================================================

/// A row being edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct EditState {
    pub id: i64,
    pub columns: Vec<ColumnSpec>,
    pub values: BTreeMap<String, String>,
    /// Columns whose current value is numeric; their input is parsed back to a number.
    pub numeric: Vec<String>,
    /// Columns holding lists, objects or booleans; their input is parsed as JSON.
    pub structured: Vec<String>,
    pub focus: usize,
}

impl EditState {
    /// Start editing `id` with the current cells as initial input.
    pub fn new(id: i64, columns: &[ColumnSpec], cells: Vec<(String, CellValue)>) -> Self {
        let numeric = cells
            .iter()
            .filter(|(_, cell)| cell.is_numeric())
            .map(|(key, _)| key.clone())
            .collect();
        let structured = cells
            .iter()
            .filter(|(_, cell)| matches!(cell, CellValue::Json(_) | CellValue::Bool(_)))
            .map(|(key, _)| key.clone())
            .collect();
        let values = cells
            .into_iter()
            .map(|(key, cell)| (key, cell.to_string()))
            .collect();
        let columns: Vec<ColumnSpec> = columns
            .iter()
            .filter(|c| is_editable(&c.key))
            .cloned()
            .collect();
        Self {
            id,
            columns,
            values,
            numeric,
            structured,
            focus: 0,
        }
    }

    pub fn focused_key(&self) -> Option<&str> {
        self.columns.get(self.focus).map(|c| c.key.as_str())
    }

    pub fn focus_next(&mut self) {
        if !self.columns.is_empty() {
            self.focus = (self.focus + 1) % self.columns.len();
        }
    }

    pub fn focus_previous(&mut self) {
        if !self.columns.is_empty() {
            self.focus = (self.focus + self.columns.len() - 1) % self.columns.len();
        }
    }

    pub fn type_char(&mut self, c: char) {
        if let Some(key) = self.focused_key().map(str::to_string) {
            self.values.entry(key).or_default().push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(key) = self.focused_key().map(str::to_string) {
            if let Some(value) = self.values.get_mut(&key) {
                value.pop();
            }
        }
    }

    /// Build the update payload; `id` and server-assigned keys are never sent.
    pub fn to_patch(&self, fields: &[FieldSpec]) -> Result<JsonRow> {
        let mut patch = JsonRow::new();
        for column in &self.columns {
            let text = self
                .values
                .get(&column.key)
                .map(|v| v.trim())
                .unwrap_or_default();

            let field = fields.iter().find(|f| f.key == column.key);
            let required = field.is_some_and(|f| f.required);
            let numeric = self.numeric.contains(&column.key)
                || field.is_some_and(|f| !matches!(f.kind, FieldKind::Text));
            if required && text.is_empty() {
                return Err(PickerError::validation(format!(
                    "{} is required",
                    column.label
                )));
            }

            let value = if text.is_empty() {
                Value::Null
            } else if numeric {
                parse_number(text).ok_or_else(|| {
                    PickerError::validation(format!("{} must be a number", column.label))
                })?
            } else if self.structured.contains(&column.key) {
                serde_json::from_str(text).map_err(|_| {
                    PickerError::validation(format!("{} must be valid JSON", column.label))
                })?
            } else {
                Value::String(text.to_string())
            };
            patch.insert(column.key.clone(), value);
        }
        Ok(patch)
    }
}

/// Whether a column can be edited inline.
pub fn is_editable(key: &str) -> bool {
    !SERVER_ASSIGNED_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::describe::Describable;
    use crate::model::{CpuRow, ProgramRow};

    fn options() -> Vec<SelectOption> {
        vec![
            SelectOption {
                id: 1,
                name: "Radeon 780M".into(),
            },
            SelectOption {
                id: 2,
                name: "GeForce RTX 4060".into(),
            },
            SelectOption {
                id: 3,
                name: "Radeon 680M".into(),
            },
        ]
    }

    #[test]
    fn test_filter_needs_two_chars() {
        let start = Instant::now();
        let mut filter = SelectFilter::new(Duration::ZERO);
        filter.push('r', start);
        filter.tick(start);
        assert!(filter.matches(&options()).is_empty());

        filter.push('a', start);
        filter.tick(start);
        assert_eq!(filter.matches(&options()).len(), 2);
    }

    #[test]
    fn test_filter_is_debounced() {
        let start = Instant::now();
        let mut filter = SelectFilter::new(Duration::from_millis(300));
        filter.push('G', start);
        filter.push('e', start);
        assert!(!filter.tick(start + Duration::from_millis(100)));
        assert!(filter.matches(&options()).is_empty());

        assert!(filter.tick(start + Duration::from_millis(300)));
        let names: Vec<_> = filter.matches(&options()).iter().map(|o| o.id).collect();
        assert_eq!(names, vec![2]);
    }

    #[test]
    fn test_pick_option_stores_id() {
        let start = Instant::now();
        let mut form = AddForm::new(CpuRow::fields(), Duration::ZERO);
        let mut all = HashMap::new();
        all.insert(OptionSource::Gpus, options());

        form.focus = 2; // integrated_gpu_id
        form.type_char('6', start);
        form.type_char('8', start);
        form.tick(start);
        assert!(form.pick_option(&all));
        assert_eq!(form.values.get("integrated_gpu_id").map(String::as_str), Some("3"));
        assert_eq!(form.filter("integrated_gpu_id").unwrap().input(), "");
    }

    #[test]
    fn test_option_cursor_stays_within_matches() {
        let start = Instant::now();
        let mut form = AddForm::new(CpuRow::fields(), Duration::ZERO);
        let mut all = HashMap::new();
        all.insert(OptionSource::Gpus, options());

        form.focus = 2;
        form.type_char('r', start);
        form.type_char('a', start);
        form.tick(start);
        form.move_option(5, &all);
        assert_eq!(form.option_cursor, 1);
        form.move_option(-3, &all);
        assert_eq!(form.option_cursor, 0);
        form.move_option(1, &all);
        assert!(form.pick_option(&all));
        assert_eq!(form.values["integrated_gpu_id"], "3");
    }

    #[test]
    fn test_text_fields_take_input_directly() {
        let mut form = AddForm::new(CpuRow::fields(), Duration::ZERO);
        for c in "i7".chars() {
            form.type_char(c, Instant::now());
        }
        assert_eq!(form.values["name"], "i7");
        form.backspace(Instant::now());
        assert_eq!(form.values["name"], "i");
    }

    #[test]
    fn test_edit_keeps_numeric_columns_numeric() {
        let row = CpuRow {
            id: Some(5),
            name: "Core i7".into(),
            benchmark_cpu: Some(2000.0),
            integrated_gpu_id: None,
            rank_cpu: Some(9),
        };
        let columns = CpuRow::columns();
        let cells = columns
            .iter()
            .map(|c| (c.key.clone(), row.cell(&c.key)))
            .collect();
        let mut edit = EditState::new(5, &columns, cells);
        assert!(edit.columns.iter().all(|c| c.key != "id"));

        // focus "benchmark_cpu" and append a digit
        edit.focus_next();
        edit.type_char('5');
        let patch = edit.to_patch(&CpuRow::fields()).unwrap();
        assert_eq!(patch["benchmark_cpu"], serde_json::json!(20005));
        assert_eq!(patch["name"], "Core i7");
        assert_eq!(patch["integrated_gpu_id"], Value::Null);
        assert!(!patch.contains_key("id"));
    }

    #[test]
    fn test_edit_rejects_cleared_required_field() {
        let columns = vec![ColumnSpec::new("id", "ID"), ColumnSpec::new("name", "Name")];
        let mut edit = EditState::new(
            1,
            &columns,
            vec![("name".into(), CellValue::Text("x".into()))],
        );
        edit.backspace();
        assert!(edit.to_patch(&CpuRow::fields()).unwrap_err().is_validation());
    }

    #[test]
    fn test_edit_parses_list_columns_back_to_json() {
        let columns = vec![
            ColumnSpec::new("name", "Name"),
            ColumnSpec::new("category", "Category"),
        ];
        let mut edit = EditState::new(
            3,
            &columns,
            vec![
                ("name".into(), CellValue::Text("Blender".into())),
                ("category".into(), CellValue::Json(r#"["3d"]"#.into())),
            ],
        );
        let patch = edit.to_patch(&ProgramRow::fields()).unwrap();
        assert_eq!(patch["category"], serde_json::json!(["3d"]));

        edit.focus_next();
        edit.backspace();
        assert!(edit.to_patch(&ProgramRow::fields()).unwrap_err().is_validation());
    }
}
